use std::path::Path;

use serde::Deserialize;
use crate::errors::A11yError;

/// A URL to scan, optionally labelled for humans.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanTarget {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

impl ScanTarget {
    pub fn new(url: &str) -> Self {
        Self { name: None, url: url.to_string() }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TargetEntry {
    Url(String),
    Named(ScanTarget),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TargetFile {
    List(Vec<TargetEntry>),
    Wrapped { targets: Vec<TargetEntry> },
}

/// Load a job's target list.
///
/// Accepts a bare array (`["https://a", {"url": "https://b"}]`) or an
/// object with a `targets` array. Duplicates are kept.
pub async fn load_targets(path: &Path) -> Result<Vec<ScanTarget>, A11yError> {
    if !path.exists() {
        return Err(A11yError::Precondition(format!(
            "{} not found",
            path.display()
        )));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_targets(&content)
        .map_err(|e| A11yError::Precondition(format!("{}: {}", path.display(), e)))
}

pub fn parse_targets(content: &str) -> Result<Vec<ScanTarget>, String> {
    let file: TargetFile = serde_json::from_str(content)
        .map_err(|e| format!("not a valid target list: {}", e))?;

    let entries = match file {
        TargetFile::List(entries) => entries,
        TargetFile::Wrapped { targets } => targets,
    };

    if entries.is_empty() {
        return Err("target list is empty".to_string());
    }

    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            TargetEntry::Url(url) => ScanTarget::new(&url),
            TargetEntry::Named(target) => target,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_list() {
        let targets = parse_targets(r#"["https://example.com", "https://example.org"]"#).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].url, "https://example.com");
        assert_eq!(targets[0].name, None);
    }

    #[test]
    fn test_parse_wrapped_named_targets() {
        let targets = parse_targets(
            r#"{"targets": [{"name": "Home", "url": "https://example.com"}, "https://example.com/about"]}"#,
        )
        .unwrap();
        assert_eq!(targets[0].label(), "Home");
        assert_eq!(targets[1].label(), "https://example.com/about");
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let targets = parse_targets(r#"["https://a.test", "https://a.test"]"#).unwrap();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(parse_targets("[]").is_err());
        assert!(parse_targets(r#"{"targets": []}"#).is_err());
        assert!(parse_targets("not json").is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_precondition() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_targets(&dir.path().join("urls.json")).await.unwrap_err();
        assert!(matches!(err, A11yError::Precondition(_)));
    }
}
