pub mod formatting;
pub mod naming;

pub use formatting::{format_duration, pluralize};
pub use naming::{slugify, url_label, url_location};
