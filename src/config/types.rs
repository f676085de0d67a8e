use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENGINE_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/axe-core/4.9.1/axe.min.js";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct A11yConfig {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
}

/// How a single page is loaded and audited.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScannerConfig {
    /// Script URL of the rule engine injected into the page.
    pub engine_url: String,
    /// Bound on reaching network quiescence.
    pub navigation_timeout_secs: u64,
    /// Bound on loading and running the rule engine.
    pub engine_timeout_secs: u64,
    pub node_binary: String,
    /// Working directory for the driver, where `playwright` is resolvable.
    pub driver_dir: Option<PathBuf>,
    pub headless: bool,
    /// Restrict the engine to these rule tags (e.g. `wcag2a`, `wcag2aa`).
    pub tags: Option<Vec<String>>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            engine_url: DEFAULT_ENGINE_URL.to_string(),
            navigation_timeout_secs: 90,
            engine_timeout_secs: 60,
            node_binary: "node".to_string(),
            driver_dir: None,
            headless: true,
            tags: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReportsConfig {
    pub root: PathBuf,
    /// Take a best-effort full-page screenshot of every target under `{root}/screenshots`.
    pub screenshots: bool,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("reports"),
            screenshots: true,
        }
    }
}
