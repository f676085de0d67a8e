use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use crate::errors::A11yError;
use crate::models::ScanResult;
use super::engine::RuleEngine;

/// Runs one all-or-nothing scan per URL on top of a rule engine.
#[derive(Clone)]
pub struct Scanner {
    engine: Arc<dyn RuleEngine>,
}

impl Scanner {
    pub fn new(engine: Arc<dyn RuleEngine>) -> Self {
        Self { engine }
    }

    pub async fn scan(&self, url: &str) -> Result<ScanResult, A11yError> {
        let url = url.trim();
        validate_url(url)?;

        info!(url = %url, engine = self.engine.engine_name(), "Scanning accessibility");
        let started = Instant::now();

        let raw = match self.engine.run(url).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(url = %url, error_type = e.classify().error_type, error = %e, "Scan failed");
                return Err(e);
            }
        };
        let result = ScanResult::from_raw(url, Local::now(), raw)?;

        info!(
            url = %url,
            violations = result.total_violations(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Scan finished"
        );
        Ok(result)
    }

    /// Screenshot location the engine uses for `url`, if it takes screenshots.
    pub fn screenshot_path(&self, url: &str) -> Option<PathBuf> {
        self.engine.screenshot_path(url.trim())
    }
}

/// A target must carry a scheme; the browser cannot navigate to a bare host.
pub fn validate_url(url: &str) -> Result<(), A11yError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(A11yError::InvalidTarget("empty URL".into()));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(A11yError::InvalidTarget(format!("URL contains whitespace: {}", url)));
    }
    match trimmed.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => Ok(()),
        _ => Err(A11yError::InvalidTarget(format!("URL has no scheme: {}", url))),
    }
}
