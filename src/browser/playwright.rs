use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ScannerConfig;
use crate::errors::A11yError;
use crate::utils::{slugify, url_location};
use super::engine::RuleEngine;

/// Extra time on top of the page and engine bounds for browser start-up and teardown.
const PROCESS_GRACE_SECS: u64 = 30;

const REQUEST_ENV: &str = "A11Y_SCAN_REQUEST";
const RESULT_PREFIX: &str = "RESULT:";
const ERROR_PREFIX: &str = "ERROR:";

/// Runs axe-core through Playwright in a throwaway Node.js process.
///
/// Every call starts its own `node` process and its own Chromium instance, so
/// no cookies, storage or DOM state carry over between URLs. The driver script
/// reports a single `RESULT:` line on success or an `ERROR:<stage>:` line on
/// failure, where the stage tells which of navigation, engine injection or
/// rule execution went wrong.
pub struct PlaywrightEngine {
    config: ScannerConfig,
    screenshot_dir: Option<PathBuf>,
}

impl PlaywrightEngine {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config, screenshot_dir: None }
    }

    /// Save a full-page PNG of every scanned page into `dir`, as `{slug}.png`.
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    fn request(&self, url: &str) -> serde_json::Value {
        // The driver may run from `driver_dir`, so relative paths would land there
        let screenshot = self
            .screenshot_path(url)
            .map(|p| absolute(p).display().to_string());
        serde_json::json!({
            "url": url,
            "engineUrl": self.config.engine_url,
            "navigationTimeoutMs": self.config.navigation_timeout_secs * 1000,
            "engineTimeoutMs": self.config.engine_timeout_secs * 1000,
            "headless": self.config.headless,
            "tags": self.config.tags,
            "screenshotPath": screenshot,
        })
    }

    fn process_timeout(&self) -> Duration {
        Duration::from_secs(
            self.config.navigation_timeout_secs + self.config.engine_timeout_secs + PROCESS_GRACE_SECS,
        )
    }
}

#[async_trait]
impl RuleEngine for PlaywrightEngine {
    async fn run(&self, url: &str) -> Result<serde_json::Value, A11yError> {
        let request = self.request(url);
        debug!(url = %url, node = %self.config.node_binary, "Launching browser driver");

        if let Some(dir) = &self.screenshot_dir {
            prepare_screenshot_dir(dir).await;
        }

        let mut cmd = Command::new(&self.config.node_binary);
        cmd.arg("-")
            .env(REQUEST_ENV, request.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.driver_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            A11yError::Navigation(format!(
                "failed to start browser driver '{}': {}",
                self.config.node_binary, e
            ))
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            let written: std::io::Result<()> = async {
                stdin.write_all(DRIVER_SCRIPT.as_bytes()).await?;
                stdin.shutdown().await
            }
            .await;
            written.map_err(|e| {
                A11yError::Navigation(format!("failed to hand script to browser driver: {}", e))
            })?;
        }

        // Dropping the future on timeout drops the child, which kills it
        let timeout = self.process_timeout();
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| A11yError::Timeout(format!(
                "browser driver for {} did not finish within {}s",
                url,
                timeout.as_secs()
            )))??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_driver_output(&stdout, &stderr, output.status.code())
    }

    fn engine_name(&self) -> &str {
        "axe-core (Playwright)"
    }

    fn screenshot_path(&self, url: &str) -> Option<PathBuf> {
        self.screenshot_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.png", slugify(url_location(url)))))
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

/// Screenshots are best effort; a directory we cannot create only costs the image.
async fn prepare_screenshot_dir(dir: &Path) {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!(dir = %dir.display(), error = %e, "Cannot create screenshot directory");
    }
}

/// Decode what the driver printed into a result document or a typed error.
pub fn parse_driver_output(
    stdout: &str,
    stderr: &str,
    exit_code: Option<i32>,
) -> Result<serde_json::Value, A11yError> {
    for line in stdout.lines() {
        if let Some(payload) = line.strip_prefix(RESULT_PREFIX) {
            return serde_json::from_str(payload).map_err(|e| {
                A11yError::EngineExecution(format!("rule engine returned malformed JSON: {}", e))
            });
        }
        if let Some(rest) = line.strip_prefix(ERROR_PREFIX) {
            let (stage, message) = rest.split_once(':').unwrap_or(("execution", rest));
            let message = message.trim().to_string();
            return Err(match stage {
                "launch" | "navigation" => A11yError::Navigation(message),
                "injection" => A11yError::EngineInjection(message),
                _ => A11yError::EngineExecution(message),
            });
        }
    }

    let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
    let tail: Vec<&str> = tail.into_iter().rev().collect();
    Err(A11yError::EngineExecution(format!(
        "browser driver exited with status {} and no result{}{}",
        exit_code.map(|c| c.to_string()).unwrap_or_else(|| "signal".into()),
        if tail.is_empty() { "" } else { ": " },
        tail.join(" / ")
    )))
}

const DRIVER_SCRIPT: &str = r#"const { chromium } = require('playwright');

const req = JSON.parse(process.env.A11Y_SCAN_REQUEST);

function report(stage, err) {
  const msg = String((err && err.message) || err).replace(/\s+/g, ' ');
  process.stdout.write('ERROR:' + stage + ':' + msg + '\n');
}

async function screenshot(page) {
  if (!page || !req.screenshotPath) return false;
  try {
    await page.screenshot({ path: req.screenshotPath, fullPage: true });
    return true;
  } catch (err) {
    process.stderr.write('screenshot failed: ' + String((err && err.message) || err) + '\n');
    return false;
  }
}

(async () => {
  let browser = null;
  let page = null;
  let captured = false;
  let stage = 'launch';
  try {
    browser = await chromium.launch({ headless: req.headless });
    page = await (await browser.newContext()).newPage();

    stage = 'navigation';
    await page.goto(req.url, { waitUntil: 'networkidle', timeout: req.navigationTimeoutMs });
    captured = await screenshot(page);

    stage = 'injection';
    await page.addScriptTag({ url: req.engineUrl });
    await page.waitForFunction(() => typeof window.axe !== 'undefined', null, { timeout: req.engineTimeoutMs });

    stage = 'execution';
    const options = { resultTypes: ['violations'] };
    if (req.tags && req.tags.length) {
      options.runOnly = { type: 'tag', values: req.tags };
    }
    const results = await page.evaluate(async (opts) => {
      const out = await window.axe.run(document, opts);
      return { ...out, passes: [], incomplete: [], inapplicable: [] };
    }, options);

    process.stdout.write('RESULT:' + JSON.stringify(results) + '\n');
    process.exitCode = 0;
  } catch (err) {
    if (!captured) {
      await screenshot(page);
    }
    report(stage, err);
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close().catch(() => {});
    }
  }
})();
"#;
