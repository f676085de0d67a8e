use std::path::PathBuf;

use async_trait::async_trait;
use crate::errors::A11yError;

/// A rule engine that audits one rendered page and returns its raw result
/// document (expected to carry a `violations` array).
#[async_trait]
pub trait RuleEngine: Send + Sync {
    /// Load `url` in a fresh browser session and run the rules against it.
    ///
    /// Fails with `Navigation`, `EngineInjection`, `EngineExecution` or
    /// `Timeout`; never returns a partial document.
    async fn run(&self, url: &str) -> Result<serde_json::Value, A11yError>;

    /// Engine name for logging
    fn engine_name(&self) -> &str;

    /// Where a best-effort page screenshot for `url` is saved, if the engine takes one.
    /// The file may be missing when capture failed.
    fn screenshot_path(&self, _url: &str) -> Option<PathBuf> {
        None
    }
}
