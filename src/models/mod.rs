pub mod violation;
pub mod scan_result;
pub mod target;

pub use violation::*;
pub use scan_result::*;
pub use target::{ScanTarget, load_targets};
