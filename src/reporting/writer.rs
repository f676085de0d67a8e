use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::errors::A11yError;
use crate::models::ScanResult;
use super::csv::CsvFormatter;
use super::formatter::{ReportContext, ReportFormatter, SiblingLinks};
use super::html::HtmlFormatter;
use super::json::JsonFormatter;
use super::normalize::ReportRow;
use super::paths::{file_name, NamingMode, ReportArtifactSet};

/// Writes the JSON/CSV/HTML triad to the dated archive and to the `latest.*` pointers.
pub struct ReportWriter {
    root: PathBuf,
    naming: NamingMode,
}

impl ReportWriter {
    pub fn new(root: impl Into<PathBuf>, naming: NamingMode) -> Self {
        Self { root: root.into(), naming }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist all six files for one scan.
    ///
    /// JSON and CSV are rendered once and written to both destinations. The
    /// HTML is rendered per destination so its download links name the files
    /// next to it; nothing else differs between the two HTML copies.
    /// A failure partway leaves earlier files in place and is returned as
    /// `ReportWrite`.
    pub async fn write(
        &self,
        result: &ScanResult,
        rows: &[ReportRow],
        now: DateTime<Local>,
    ) -> Result<ReportArtifactSet, A11yError> {
        let paths = ReportArtifactSet::compute(&self.root, &result.url, &now, self.naming);

        tokio::fs::create_dir_all(paths.dated_dir())
            .await
            .map_err(|e| A11yError::report_write(paths.dated_dir(), e))?;

        let dated_links = SiblingLinks {
            csv_name: file_name(&paths.dated_csv),
            json_name: file_name(&paths.dated_json),
        };
        let latest_links = SiblingLinks {
            csv_name: file_name(&paths.latest_csv),
            json_name: file_name(&paths.latest_json),
        };

        let dated_ctx = ReportContext { result, rows, links: dated_links };
        let latest_ctx = ReportContext { result, rows, links: latest_links };

        let json_text = JsonFormatter.format(&dated_ctx)?;
        let csv_text = CsvFormatter.format(&dated_ctx)?;
        let dated_html = HtmlFormatter.format(&dated_ctx)?;
        let latest_html = HtmlFormatter.format(&latest_ctx)?;

        write_file(&paths.dated_json, &json_text).await?;
        write_file(&paths.dated_html, &dated_html).await?;
        write_file(&paths.dated_csv, &csv_text).await?;

        write_file(&paths.latest_json, &json_text).await?;
        write_file(&paths.latest_html, &latest_html).await?;
        write_file(&paths.latest_csv, &csv_text).await?;

        info!(
            url = %result.url,
            json = %paths.dated_json.display(),
            html = %paths.dated_html.display(),
            csv = %paths.dated_csv.display(),
            "Reports written"
        );

        Ok(paths)
    }
}

async fn write_file(path: &Path, content: &str) -> Result<(), A11yError> {
    debug!(path = %path.display(), bytes = content.len(), "Writing report file");
    tokio::fs::write(path, content)
        .await
        .map_err(|e| A11yError::report_write(path, e))
}
