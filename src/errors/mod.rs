pub mod types;
pub mod classification;

pub use types::A11yError;
pub use classification::{ErrorClassification, ErrorScope};
