use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::utils::naming::{dated_basename, fixed_basename};

const LATEST_STEM: &str = "latest";

/// Directory under the report root holding page screenshots.
pub const SCREENSHOT_DIR: &str = "screenshots";

/// How archive file names are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingMode {
    /// `{root}/{YYYY}/{MM}/{timestamp}_{slug}_a11y.*`
    #[default]
    Dated,
    /// `{root}/{slug}_a11y.*`, for per-run output directories.
    Fixed,
}

/// The six files one scan produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArtifactSet {
    pub dated_json: PathBuf,
    pub dated_html: PathBuf,
    pub dated_csv: PathBuf,
    pub latest_json: PathBuf,
    pub latest_html: PathBuf,
    pub latest_csv: PathBuf,
}

impl ReportArtifactSet {
    /// Derive every path from the URL and the clock. Pure; touches no files.
    pub fn compute<Tz: TimeZone>(root: &Path, url: &str, now: &DateTime<Tz>, naming: NamingMode) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let (dir, base) = match naming {
            NamingMode::Dated => (
                root.join(format!("{:04}", now.year())).join(format!("{:02}", now.month())),
                dated_basename(url, now),
            ),
            NamingMode::Fixed => (root.to_path_buf(), fixed_basename(url)),
        };

        Self {
            dated_json: dir.join(format!("{}.json", base)),
            dated_html: dir.join(format!("{}.html", base)),
            dated_csv: dir.join(format!("{}.csv", base)),
            latest_json: root.join(format!("{}.json", LATEST_STEM)),
            latest_html: root.join(format!("{}.html", LATEST_STEM)),
            latest_csv: root.join(format!("{}.csv", LATEST_STEM)),
        }
    }

    /// Directory holding the archived copies.
    pub fn dated_dir(&self) -> &Path {
        self.dated_json.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn all(&self) -> [&Path; 6] {
        [
            &self.dated_json,
            &self.dated_html,
            &self.dated_csv,
            &self.latest_json,
            &self.latest_html,
            &self.latest_csv,
        ]
    }
}

/// File name component of a path, for relative links.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
