use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use tracing::{info, warn};

use crate::errors::A11yError;
use crate::models::{Impact, ScanResult};
use super::html::html_escape;
use super::normalize::{severity_counts, SeverityCounts};

pub const INDEX_FILE: &str = "index.html";

const REPORT_JSON_SUFFIX: &str = "_a11y.json";

static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}_\d{6}_").expect("static regex")
});

/// The newest `{year}/{month}` folder of the dated archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFolder {
    pub year: String,
    pub month: String,
    pub path: PathBuf,
}

/// One archived report listed on the index page.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Page slug, without timestamp and suffix.
    pub label: String,
    /// Report basename shared by the `.json`, `.csv` and `.html` files.
    pub stem: String,
    /// `None` when the JSON report could not be read.
    pub total: Option<usize>,
    pub counts: Option<SeverityCounts>,
}

/// Find the lexically newest `YYYY/MM` folder under `root`.
pub async fn newest_run_folder(root: &Path) -> Result<Option<RunFolder>, A11yError> {
    let Some(year) = numbered_dirs(root, 4).await?.pop() else {
        return Ok(None);
    };
    let year_path = root.join(&year);
    let Some(month) = numbered_dirs(&year_path, 2).await?.pop() else {
        return Ok(None);
    };
    let path = year_path.join(&month);
    Ok(Some(RunFolder { year, month, path }))
}

/// Sorted names of the sub-directories made of exactly `width` digits.
async fn numbered_dirs(dir: &Path, width: usize) -> Result<Vec<String>, A11yError> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.len() == width && name.bytes().all(|b| b.is_ascii_digit()) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Every archived report in `folder`, sorted by file name.
pub async fn collect_entries(folder: &Path) -> Result<Vec<IndexEntry>, A11yError> {
    let mut stems = Vec::new();
    let mut entries = tokio::fs::read_dir(folder).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(base) = name.strip_suffix(".json") {
            if name.ends_with(REPORT_JSON_SUFFIX) {
                stems.push(base.to_string());
            }
        }
    }
    stems.sort();

    let mut out = Vec::with_capacity(stems.len());
    for stem in stems {
        let label = page_label(&stem);
        let stats = read_stats(&folder.join(format!("{}.json", stem)), &label).await;
        out.push(IndexEntry {
            label,
            total: stats.map(|(total, _)| total),
            counts: stats.map(|(_, counts)| counts),
            stem,
        });
    }
    Ok(out)
}

fn page_label(stem: &str) -> String {
    let without_time = TIMESTAMP_PREFIX.replace(stem, "");
    without_time
        .strip_suffix("_a11y")
        .unwrap_or(&*without_time)
        .to_string()
}

async fn read_stats(path: &Path, label: &str) -> Option<(usize, SeverityCounts)> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read archived report");
            return None;
        }
    };
    let raw = serde_json::from_str(&content).ok()?;
    let result = ScanResult::from_raw(label, Local::now(), raw).ok()?;
    Some((result.total_violations(), severity_counts(&result)))
}

/// Render the index page. `link_prefix` is prepended to every report link
/// (empty for an index written next to the reports).
pub fn render_index(title: &str, entries: &[IndexEntry], link_prefix: &str) -> Result<String, A11yError> {
    let mut out = String::with_capacity(4096 + entries.len() * 512);
    write_index_html(&mut out, title, entries, link_prefix)
        .map_err(|e| A11yError::ReportWrite(format!("index rendering error: {}", e)))?;
    Ok(out)
}

fn write_index_html(out: &mut String, title: &str, entries: &[IndexEntry], prefix: &str) -> std::fmt::Result {
    writeln!(out, "<!doctype html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
    writeln!(out, "<title>{}</title>", html_escape(title))?;
    writeln!(out, "<style>{}</style>", STYLE)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<main class=\"wrap\">")?;
    writeln!(out, "<h1>{}</h1>", html_escape(title))?;
    writeln!(out, "<p class=\"sub\">Newest scans. Each row links to the page report and its downloads.</p>")?;
    writeln!(out, "<table>")?;
    writeln!(out, "<thead><tr><th>Page</th><th>Violations</th><th>Severity</th><th>Artifacts</th></tr></thead>")?;
    writeln!(out, "<tbody>")?;

    for entry in entries {
        writeln!(out, "<tr>")?;
        writeln!(out, "<td>{}</td>", html_escape(&entry.label))?;
        match entry.total {
            Some(total) => writeln!(out, "<td>{}</td>", total)?,
            None => writeln!(out, "<td>n/a</td>")?,
        }
        match &entry.counts {
            Some(counts) => {
                write!(out, "<td>")?;
                for impact in Impact::KNOWN {
                    write!(
                        out,
                        "<span class=\"pill {cls}\">{cls}: {n}</span>",
                        cls = impact.as_str(),
                        n = counts.get(impact),
                    )?;
                }
                writeln!(out, "</td>")?;
            }
            None => writeln!(out, "<td><span class=\"muted\">n/a</span></td>")?,
        }
        write!(out, "<td class=\"links\">")?;
        for (label, ext) in [("HTML", "html"), ("CSV", "csv"), ("JSON", "json")] {
            let href = format!("{}{}.{}", prefix, entry.stem, ext);
            write!(
                out,
                "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>",
                html_escape(&href),
                label
            )?;
        }
        writeln!(out, "</td>")?;
        writeln!(out, "</tr>")?;
    }

    writeln!(out, "</tbody>")?;
    writeln!(out, "</table>")?;
    writeln!(out, "<p class=\"muted\">Open <code>latest.html</code> for the most recent single-page report.</p>")?;
    writeln!(out, "</main>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

/// Build the index of the newest archive month and write it both into that
/// month's folder and at `{root}/index.html`. Returns the two paths.
pub async fn write_index(root: &Path) -> Result<(PathBuf, PathBuf), A11yError> {
    if !root.is_dir() {
        return Err(A11yError::Precondition(format!(
            "report root {} not found; run scans first",
            root.display()
        )));
    }
    let folder = newest_run_folder(root).await?.ok_or_else(|| {
        A11yError::Precondition(format!("no YYYY/MM report folders under {}", root.display()))
    })?;
    let entries = collect_entries(&folder.path).await?;
    if entries.is_empty() {
        return Err(A11yError::Precondition(format!(
            "no *{} reports in {}",
            REPORT_JSON_SUFFIX,
            folder.path.display()
        )));
    }

    let title = format!("Accessibility reports ({}/{})", folder.year, folder.month);
    let month_index = folder.path.join(INDEX_FILE);
    let root_index = root.join(INDEX_FILE);

    let local = render_index(&title, &entries, "")?;
    let nested = render_index(&title, &entries, &format!("{}/{}/", folder.year, folder.month))?;
    tokio::fs::write(&month_index, local)
        .await
        .map_err(|e| A11yError::report_write(&month_index, e))?;
    tokio::fs::write(&root_index, nested)
        .await
        .map_err(|e| A11yError::report_write(&root_index, e))?;

    info!(reports = entries.len(), index = %root_index.display(), "Report index written");
    Ok((month_index, root_index))
}

const STYLE: &str = "
body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; padding: 24px; background: #10141c; color: #e6edf3; }
.wrap { max-width: 1120px; margin: 0 auto; }
h1 { margin: 0 0 6px; font-size: 22px; }
.sub { opacity: .85; margin-bottom: 18px; font-size: 14px; }
table { width: 100%; border-collapse: collapse; border: 1px solid #2a3140; }
th, td { padding: 10px 12px; border-bottom: 1px solid #2a3140; font-size: 14px; vertical-align: top; text-align: left; }
a { color: #8ab4f8; text-decoration: none; margin-right: 10px; }
.pill { display: inline-block; padding: 2px 10px; border-radius: 999px; border: 1px solid #3a4252; font-size: 12px; margin: 0 6px 6px 0; }
.critical { border-color: #d33; } .serious { border-color: #e80; } .moderate { border-color: #cc0; } .minor { border-color: #0bb; }
.muted { opacity: .75; font-size: 13px; }
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn archive(root: &Path, year: &str, month: &str, stem: &str, body: &str) {
        let dir = root.join(year).join(month);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.json", stem)), body).unwrap();
    }

    #[test]
    fn test_page_label() {
        assert_eq!(page_label("2026-03-14_092653_www-example-com_a11y"), "www-example-com");
        assert_eq!(page_label("example-com-about_a11y"), "example-com-about");
    }

    #[tokio::test]
    async fn test_newest_folder_ignores_non_numeric_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        for dir in ["2025/12", "2026/01", "2026/02", "screenshots", "2026/notes"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        let folder = newest_run_folder(tmp.path()).await.unwrap().unwrap();
        assert_eq!((folder.year.as_str(), folder.month.as_str()), ("2026", "02"));
    }

    #[tokio::test]
    async fn test_entries_count_violations_per_report() {
        let tmp = tempfile::TempDir::new().unwrap();
        archive(
            tmp.path(), "2026", "03", "2026-03-01_100000_a-test_a11y",
            r#"{"violations":[{"id":"x","impact":"critical"},{"id":"y","impact":"weird"}]}"#,
        );
        archive(tmp.path(), "2026", "03", "2026-03-01_100001_b-test_a11y", "{ not json");
        fs::write(tmp.path().join("2026/03/notes.json"), "{}").unwrap();

        let entries = collect_entries(&tmp.path().join("2026/03")).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "a-test");
        assert_eq!(entries[0].total, Some(2));
        let counts = entries[0].counts.unwrap();
        assert_eq!((counts.critical, counts.unknown), (1, 1));
        assert_eq!(entries[1].total, None);
    }

    #[test]
    fn test_render_escapes_and_prefixes_links() {
        let entries = vec![IndexEntry {
            label: "<b>x</b>".into(),
            stem: "2026-03-01_100000_x_a11y".into(),
            total: Some(0),
            counts: Some(SeverityCounts::default()),
        }];
        let html = render_index("Reports", &entries, "2026/03/").unwrap();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains("href=\"2026/03/2026-03-01_100000_x_a11y.csv\""));
        assert!(html.contains("critical: 0"));
        assert!(!html.contains("unknown:"));
    }

    #[tokio::test]
    async fn test_write_index_to_month_and_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        archive(tmp.path(), "2026", "04", "2026-04-02_080000_a-test_a11y", r#"{"violations":[]}"#);

        let (month, root) = write_index(tmp.path()).await.unwrap();
        assert_eq!(month, tmp.path().join("2026/04/index.html"));
        assert!(fs::read_to_string(&month).unwrap().contains("href=\"2026-04-02_080000_a-test_a11y.html\""));
        assert!(fs::read_to_string(&root).unwrap().contains("href=\"2026/04/2026-04-02_080000_a-test_a11y.html\""));
    }

    #[tokio::test]
    async fn test_write_index_without_archive_is_precondition() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = write_index(tmp.path()).await.unwrap_err();
        assert!(matches!(err, A11yError::Precondition(_)));
        let err = write_index(&tmp.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, A11yError::Precondition(_)));
    }
}
