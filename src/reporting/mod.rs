pub mod normalize;
pub mod formatter;
pub mod json;
pub mod csv;
pub mod html;
pub mod paths;
pub mod writer;
pub mod index;

pub use normalize::{flatten, severity_counts, ReportRow, SeverityCounts, NO_VIOLATIONS_MARKER};
pub use formatter::{ReportContext, ReportFormatter, SiblingLinks};
pub use paths::{NamingMode, ReportArtifactSet, SCREENSHOT_DIR};
pub use writer::ReportWriter;
pub use index::{write_index, INDEX_FILE};
