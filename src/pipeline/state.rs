use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::ScanTarget;
use crate::reporting::{ReportArtifactSet, SeverityCounts};

/// What happened to one target of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub url: String,
    pub name: Option<String>,
    pub ok: bool,
    pub error: Option<String>,
    pub error_type: Option<String>,
    pub violations: Option<usize>,
    pub severity_counts: Option<SeverityCounts>,
    pub reports: Option<ReportArtifactSet>,
    /// Page screenshot, present whenever one was captured, even for failed targets.
    #[serde(default)]
    pub screenshot: Option<PathBuf>,
    pub duration_ms: u64,
}

impl TargetOutcome {
    pub fn succeeded(
        target: &ScanTarget,
        violations: usize,
        counts: SeverityCounts,
        reports: ReportArtifactSet,
        duration_ms: u64,
    ) -> Self {
        Self {
            url: target.url.clone(),
            name: target.name.clone(),
            ok: true,
            error: None,
            error_type: None,
            violations: Some(violations),
            severity_counts: Some(counts),
            reports: Some(reports),
            screenshot: None,
            duration_ms,
        }
    }

    pub fn failed(target: &ScanTarget, error_type: &str, error: String, duration_ms: u64) -> Self {
        Self {
            url: target.url.clone(),
            name: target.name.clone(),
            ok: false,
            error: Some(error),
            error_type: Some(error_type.to_string()),
            violations: None,
            severity_counts: None,
            reports: None,
            screenshot: None,
            duration_ms,
        }
    }

    pub fn with_screenshot(mut self, screenshot: Option<PathBuf>) -> Self {
        self.screenshot = screenshot;
        self
    }
}

/// Written as `batch_summary.json` next to the reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<TargetOutcome>,
}

impl BatchSummary {
    pub fn from_outcomes(started_at: DateTime<Local>, outcomes: Vec<TargetOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.ok).count();
        Self {
            started_at,
            finished_at: Local::now(),
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }
}
