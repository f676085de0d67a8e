use crate::errors::A11yError;
use crate::models::ScanResult;
use super::normalize::ReportRow;

/// File names the HTML report links to for download. Each report links
/// the siblings written next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingLinks {
    pub csv_name: String,
    pub json_name: String,
}

/// Everything a formatter may draw from for one scan.
pub struct ReportContext<'a> {
    pub result: &'a ScanResult,
    pub rows: &'a [ReportRow],
    pub links: SiblingLinks,
}

/// Renders one report format.
pub trait ReportFormatter: Send + Sync {
    fn format(&self, ctx: &ReportContext<'_>) -> Result<String, A11yError>;
}
