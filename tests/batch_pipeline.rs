use a11y_scan::browser::{RuleEngine, Scanner};
use a11y_scan::errors::A11yError;
use a11y_scan::models::{load_targets, ScanTarget};
use a11y_scan::pipeline::{BatchRunner, SUMMARY_FILE};
use a11y_scan::reporting::{NamingMode, ReportWriter, NO_VIOLATIONS_MARKER};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Clean pages everywhere except hosts starting with "broken".
struct RecordingEngine {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl RuleEngine for RecordingEngine {
    async fn run(&self, url: &str) -> Result<Value, A11yError> {
        self.seen.lock().unwrap().push(url.to_string());
        if url.contains("://broken") {
            return Err(A11yError::EngineInjection("script blocked by CSP".into()));
        }
        Ok(json!({ "url": url, "violations": [] }))
    }

    fn engine_name(&self) -> &str {
        "recording"
    }
}

#[tokio::test]
async fn test_batch_scans_every_target_in_order() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("urls.json");
    fs::write(
        &input,
        r#"{"targets": [
            "https://broken.example.com",
            {"name": "Home", "url": "https://example.com"},
            "https://example.org"
        ]}"#,
    )
    .unwrap();

    let engine = Arc::new(RecordingEngine { seen: Mutex::new(Vec::new()) });
    let runner = BatchRunner::new(
        Scanner::new(engine.clone()),
        ReportWriter::new(tmp.path().join("out"), NamingMode::Fixed),
    );

    let targets = load_targets(&input).await.unwrap();
    let summary = runner.run(&targets).await;
    runner.write_summary(&summary).await.unwrap();

    assert_eq!(
        *engine.seen.lock().unwrap(),
        vec!["https://broken.example.com", "https://example.com", "https://example.org"]
    );
    assert_eq!((summary.succeeded, summary.failed), (2, 1));
    assert_eq!(summary.outcomes[0].error_type.as_deref(), Some("EngineInjectionError"));
    assert_eq!(summary.outcomes[1].name.as_deref(), Some("Home"));

    let out = tmp.path().join("out");
    assert!(out.join(SUMMARY_FILE).exists());
    assert!(out.join("example-com_a11y.csv").exists());
    assert!(out.join("example-org_a11y.csv").exists());
    assert!(!out.join("broken-example-com_a11y.csv").exists());

    // latest.* points at the last successful target
    let latest = fs::read_to_string(out.join("latest.csv")).unwrap();
    assert_eq!(latest.lines().count(), 2);
    assert!(latest.contains(NO_VIOLATIONS_MARKER));
    let latest_json: Value = serde_json::from_str(&fs::read_to_string(out.join("latest.json")).unwrap()).unwrap();
    assert_eq!(latest_json["url"], "https://example.org");
}

#[tokio::test]
async fn test_missing_target_list_is_precondition_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_targets(&tmp.path().join("urls.json")).await.unwrap_err();
    assert!(matches!(err, A11yError::Precondition(_)));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_pages_of_one_site_get_their_own_archives() {
    let tmp = TempDir::new().unwrap();
    let engine = Arc::new(RecordingEngine { seen: Mutex::new(Vec::new()) });
    let runner = BatchRunner::new(
        Scanner::new(engine),
        ReportWriter::new(tmp.path(), NamingMode::Fixed),
    );
    let targets = vec![
        ScanTarget::new("https://example.com/"),
        ScanTarget::new("https://example.com/about"),
    ];

    let summary = runner.run(&targets).await;
    assert_eq!(summary.succeeded, 2);

    let first = summary.outcomes[0].reports.as_ref().unwrap();
    let second = summary.outcomes[1].reports.as_ref().unwrap();
    assert_ne!(first.dated_json, second.dated_json);
    for path in first.all().iter().chain(second.all().iter()) {
        assert!(path.exists(), "missing {}", path.display());
    }

    let archived: Value = serde_json::from_str(&fs::read_to_string(&first.dated_json).unwrap()).unwrap();
    assert_eq!(archived["url"], "https://example.com/");
    let archived: Value = serde_json::from_str(&fs::read_to_string(&second.dated_json).unwrap()).unwrap();
    assert_eq!(archived["url"], "https://example.com/about");
}
