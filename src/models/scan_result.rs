use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::warn;

use super::violation::ViolationRecord;
use crate::errors::A11yError;

/// The outcome of scanning one URL.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub url: String,
    pub scanned_at: DateTime<Local>,
    /// Violations in engine order.
    pub violations: Vec<ViolationRecord>,
    /// The engine document as returned, kept for the JSON report.
    pub raw: Value,
}

impl ScanResult {
    /// Build a result from the engine's raw output.
    ///
    /// The document must be a JSON object. A missing or mistyped `violations`
    /// field is treated as an empty list.
    pub fn from_raw(url: &str, scanned_at: DateTime<Local>, raw: Value) -> Result<Self, A11yError> {
        if !raw.is_object() {
            return Err(A11yError::EngineExecution(format!(
                "rule engine returned a non-object result for {}",
                url
            )));
        }

        let violations = match raw.get("violations") {
            Some(Value::Array(items)) => items.iter().map(ViolationRecord::from_value).collect(),
            Some(_) => {
                warn!(url = %url, "Engine result has a non-array violations field, treating as empty");
                Vec::new()
            }
            None => {
                warn!(url = %url, "Engine result has no violations field, treating as empty");
                Vec::new()
            }
        };

        Ok(Self {
            url: url.to_string(),
            scanned_at,
            violations,
            raw,
        })
    }

    pub fn total_violations(&self) -> usize {
        self.violations.len()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_keeps_engine_order() {
        let raw = json!({
            "violations": [
                { "id": "region", "impact": "moderate" },
                { "id": "color-contrast", "impact": "serious" },
                { "id": "aria-roles", "impact": "critical" }
            ]
        });
        let result = ScanResult::from_raw("https://example.com", Local::now(), raw).unwrap();
        let ids: Vec<&str> = result.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["region", "color-contrast", "aria-roles"]);
        assert_eq!(result.total_violations(), 3);
    }

    #[test]
    fn test_from_raw_missing_violations_is_clean() {
        let result = ScanResult::from_raw("https://example.com", Local::now(), json!({})).unwrap();
        assert!(result.is_clean());
    }

    #[test]
    fn test_from_raw_rejects_non_object() {
        let err = ScanResult::from_raw("https://example.com", Local::now(), json!("oops")).unwrap_err();
        assert!(matches!(err, A11yError::EngineExecution(_)));
    }
}
