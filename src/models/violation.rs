use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity assigned to a violation by the rule engine.
///
/// Anything the engine reports outside the four known levels, including a
/// missing value, lands in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Critical,
    Serious,
    Moderate,
    Minor,
    Unknown,
}

impl Impact {
    pub const ALL: [Impact; 5] = [
        Impact::Critical,
        Impact::Serious,
        Impact::Moderate,
        Impact::Minor,
        Impact::Unknown,
    ];

    /// The four levels shown as badges in the HTML report.
    pub const KNOWN: [Impact; 4] = [
        Impact::Critical,
        Impact::Serious,
        Impact::Moderate,
        Impact::Minor,
    ];

    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("critical") => Impact::Critical,
            Some("serious") => Impact::Serious,
            Some("moderate") => Impact::Moderate,
            Some("minor") => Impact::Minor,
            _ => Impact::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Critical => "critical",
            Impact::Serious => "serious",
            Impact::Moderate => "moderate",
            Impact::Minor => "minor",
            Impact::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DOM location a violation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedNode {
    /// Selector path, outermost first.
    pub target: Vec<String>,
    /// Raw markup captured by the engine. Untrusted.
    pub snippet: String,
}

impl AffectedNode {
    fn from_value(value: &Value) -> Self {
        let target = match value.get("target") {
            Some(Value::Array(parts)) => parts.iter().filter_map(selector_text).collect(),
            Some(other) => selector_text(other).into_iter().collect(),
            None => Vec::new(),
        };
        Self {
            target,
            snippet: str_field(value, "html"),
        }
    }
}

/// One rule failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    pub rule_id: String,
    pub impact: Impact,
    pub description: String,
    pub help_url: String,
    pub affected_nodes: Vec<AffectedNode>,
}

impl ViolationRecord {
    /// Decode one entry of the engine's `violations` array.
    ///
    /// The engine output is untrusted: missing or mistyped fields become empty
    /// strings and lists instead of failing the scan.
    pub fn from_value(value: &Value) -> Self {
        let affected_nodes = value
            .get("nodes")
            .and_then(Value::as_array)
            .map(|nodes| nodes.iter().map(AffectedNode::from_value).collect())
            .unwrap_or_default();

        Self {
            rule_id: str_field(value, "id"),
            impact: Impact::parse(value.get("impact").and_then(Value::as_str)),
            description: str_field(value, "description"),
            help_url: str_field(value, "helpUrl"),
            affected_nodes,
        }
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Selectors are usually strings; shadow-DOM targets arrive as nested arrays.
fn selector_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let joined: Vec<String> = parts.iter().filter_map(selector_text).collect();
            if joined.is_empty() {
                None
            } else {
                Some(joined.join(" >>> "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_impact_parse_known_levels() {
        assert_eq!(Impact::parse(Some("critical")), Impact::Critical);
        assert_eq!(Impact::parse(Some("Serious")), Impact::Serious);
        assert_eq!(Impact::parse(Some(" moderate ")), Impact::Moderate);
        assert_eq!(Impact::parse(Some("minor")), Impact::Minor);
    }

    #[test]
    fn test_impact_parse_coerces_to_unknown() {
        assert_eq!(Impact::parse(None), Impact::Unknown);
        assert_eq!(Impact::parse(Some("")), Impact::Unknown);
        assert_eq!(Impact::parse(Some("blocker")), Impact::Unknown);
    }

    #[test]
    fn test_violation_from_full_value() {
        let v = json!({
            "id": "image-alt",
            "impact": "critical",
            "description": "Ensures <img> elements have alternate text",
            "helpUrl": "https://dequeuniversity.com/rules/axe/4.9/image-alt",
            "nodes": [
                { "target": ["#hero > img"], "html": "<img src=\"a.png\">" },
                { "target": ["footer", "img.logo"], "html": "<img class=\"logo\">" }
            ]
        });
        let record = ViolationRecord::from_value(&v);
        assert_eq!(record.rule_id, "image-alt");
        assert_eq!(record.impact, Impact::Critical);
        assert_eq!(record.affected_nodes.len(), 2);
        assert_eq!(record.affected_nodes[1].target, vec!["footer", "img.logo"]);
        assert_eq!(record.affected_nodes[0].snippet, "<img src=\"a.png\">");
    }

    #[test]
    fn test_violation_missing_fields_default() {
        let record = ViolationRecord::from_value(&json!({ "impact": null, "nodes": "bogus" }));
        assert_eq!(record.rule_id, "");
        assert_eq!(record.impact, Impact::Unknown);
        assert_eq!(record.help_url, "");
        assert!(record.affected_nodes.is_empty());
    }

    #[test]
    fn test_nested_shadow_target_is_joined() {
        let node = AffectedNode::from_value(&json!({ "target": [["my-widget", "button"]] }));
        assert_eq!(node.target, vec!["my-widget >>> button"]);
        assert_eq!(node.snippet, "");
    }

    #[test]
    fn test_scalar_target_becomes_single_selector() {
        let node = AffectedNode::from_value(&json!({ "target": "main", "html": "<main>" }));
        assert_eq!(node.target, vec!["main"]);
    }
}
