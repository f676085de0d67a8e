use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::browser::Scanner;
use crate::errors::A11yError;
use crate::models::{ScanResult, ScanTarget};
use crate::reporting::{flatten, severity_counts, ReportArtifactSet, ReportWriter};
use super::state::{BatchSummary, TargetOutcome};

pub const SUMMARY_FILE: &str = "batch_summary.json";

/// Scans targets one after another, one browser session each, and writes a
/// report triad per target. A failing target is recorded and skipped.
pub struct BatchRunner {
    scanner: Scanner,
    writer: ReportWriter,
}

impl BatchRunner {
    pub fn new(scanner: Scanner, writer: ReportWriter) -> Self {
        Self { scanner, writer }
    }

    pub fn screenshot_path(&self, url: &str) -> Option<PathBuf> {
        self.scanner.screenshot_path(url)
    }

    /// Scan, normalize and write reports for a single URL.
    pub async fn scan_one(&self, url: &str) -> Result<(ScanResult, ReportArtifactSet), A11yError> {
        let result = self.scanner.scan(url).await?;
        let rows = flatten(&result);
        let paths = self.writer.write(&result, &rows, Local::now()).await?;
        Ok((result, paths))
    }

    pub async fn run(&self, targets: &[ScanTarget]) -> BatchSummary {
        let started_at = Local::now();
        let progress = ProgressBar::new(targets.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/dark_gray} {pos}/{len} pages | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );

        let mut outcomes = Vec::with_capacity(targets.len());
        for (index, target) in targets.iter().enumerate() {
            progress.set_message(target.label().to_string());
            info!(index = index + 1, total = targets.len(), url = %target.url, "Batch target");

            let started = Instant::now();
            let outcome = match self.scan_one(&target.url).await {
                Ok((result, paths)) => TargetOutcome::succeeded(
                    target,
                    result.total_violations(),
                    severity_counts(&result),
                    paths,
                    started.elapsed().as_millis() as u64,
                ),
                Err(e) => {
                    let class = e.classify();
                    warn!(
                        url = %target.url,
                        error_type = class.error_type,
                        error = %e,
                        "Target failed, continuing with the rest of the batch"
                    );
                    TargetOutcome::failed(
                        target,
                        class.error_type,
                        e.to_string(),
                        started.elapsed().as_millis() as u64,
                    )
                }
            };
            let screenshot = self
                .scanner
                .screenshot_path(&target.url)
                .filter(|path| path.exists());
            outcomes.push(outcome.with_screenshot(screenshot));
            progress.inc(1);
        }
        progress.finish_and_clear();

        let summary = BatchSummary::from_outcomes(started_at, outcomes);
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch finished"
        );
        summary
    }

    /// Persist the batch summary in the report root.
    pub async fn write_summary(&self, summary: &BatchSummary) -> Result<PathBuf, A11yError> {
        let path = self.writer.root().join(SUMMARY_FILE);
        tokio::fs::create_dir_all(self.writer.root())
            .await
            .map_err(|e| A11yError::report_write(self.writer.root(), e))?;
        let json = serde_json::to_string_pretty(summary)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| A11yError::report_write(&path, e))?;
        Ok(path)
    }
}
