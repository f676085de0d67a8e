use crate::errors::A11yError;
use super::formatter::{ReportContext, ReportFormatter};

/// Pretty-printed engine document, unmodified.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, ctx: &ReportContext<'_>) -> Result<String, A11yError> {
        serde_json::to_string_pretty(&ctx.result.raw)
            .map_err(|e| A11yError::ReportWrite(format!("JSON serialization error: {}", e)))
    }
}
