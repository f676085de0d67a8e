use std::fmt::Write;

use crate::errors::A11yError;
use crate::models::{Impact, ViolationRecord};
use super::formatter::{ReportContext, ReportFormatter};
use super::normalize::{severity_counts, NO_VIOLATIONS_MARKER, TARGET_DELIMITER};

/// Nodes listed per violation card before the remainder is summarised.
const MAX_NODES_PER_CARD: usize = 10;

/// Self-contained HTML report with inline CSS and download links to its siblings.
pub struct HtmlFormatter;

impl ReportFormatter for HtmlFormatter {
    fn format(&self, ctx: &ReportContext<'_>) -> Result<String, A11yError> {
        let mut out = String::with_capacity(16_384);
        write_html_report(&mut out, ctx)
            .map_err(|e| A11yError::ReportWrite(format!("HTML rendering error: {}", e)))?;
        Ok(out)
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn write_html_report(out: &mut String, ctx: &ReportContext<'_>) -> std::fmt::Result {
    let result = ctx.result;
    let counts = severity_counts(result);

    writeln!(out, "<!doctype html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
    writeln!(out, "<title>Accessibility report: {}</title>", html_escape(&result.url))?;
    writeln!(out, "<style>{}</style>", STYLE)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<main class=\"wrap\">")?;

    // header
    writeln!(out, "<header class=\"header\">")?;
    writeln!(out, "<h1 class=\"title\">Accessibility report</h1>")?;
    writeln!(
        out,
        "<p class=\"sub\">URL: <strong>{}</strong><br>Scanned: {}</p>",
        html_escape(&result.url),
        html_escape(&result.scanned_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    )?;

    writeln!(out, "<div class=\"badges\">")?;
    for impact in Impact::KNOWN {
        writeln!(
            out,
            "<span class=\"badge {cls}\">{cls}: {n}</span>",
            cls = impact.as_str(),
            n = counts.get(impact),
        )?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, "<nav class=\"actions\">")?;
    writeln!(
        out,
        "<a class=\"btn\" href=\"{}\" download>Download CSV</a>",
        html_escape(&ctx.links.csv_name)
    )?;
    writeln!(
        out,
        "<a class=\"btn\" href=\"{}\" download>Download JSON</a>",
        html_escape(&ctx.links.json_name)
    )?;
    writeln!(out, "</nav>")?;
    writeln!(out, "</header>")?;

    writeln!(
        out,
        "<section class=\"summary\"><div class=\"stat\"><strong>Total violations:</strong> {}</div></section>",
        result.violations.len()
    )?;

    // body
    writeln!(out, "<section class=\"cards\">")?;
    if result.violations.is_empty() {
        writeln!(out, "<div class=\"success\">{}.</div>", NO_VIOLATIONS_MARKER)?;
    } else {
        for violation in &result.violations {
            write_card(out, violation)?;
        }
    }
    writeln!(out, "</section>")?;

    writeln!(out, "</main>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

fn write_card(out: &mut String, violation: &ViolationRecord) -> std::fmt::Result {
    let impact = violation.impact.as_str();
    let rule_id = if violation.rule_id.is_empty() { "unknown" } else { &violation.rule_id };

    writeln!(out, "<article class=\"card\">")?;
    writeln!(
        out,
        "<div class=\"top\"><div class=\"rule\">{}</div><div class=\"pill {}\">{}</div></div>",
        html_escape(rule_id),
        impact,
        impact,
    )?;
    writeln!(out, "<div class=\"desc\">{}</div>", html_escape(&violation.description))?;
    if !violation.help_url.is_empty() {
        writeln!(
            out,
            "<div class=\"meta\"><a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">Rule help</a></div>",
            html_escape(&violation.help_url)
        )?;
    }

    writeln!(out, "<div class=\"targets\">")?;
    writeln!(out, "<div class=\"label\">Affected nodes</div>")?;
    if violation.affected_nodes.is_empty() {
        writeln!(out, "<div class=\"code\">(no targets provided)</div>")?;
    } else {
        for node in violation.affected_nodes.iter().take(MAX_NODES_PER_CARD) {
            writeln!(
                out,
                "<div class=\"code\"><div class=\"sel\">{}</div><pre>{}</pre></div>",
                html_escape(&node.target.join(TARGET_DELIMITER)),
                html_escape(&node.snippet),
            )?;
        }
        let hidden = violation.affected_nodes.len().saturating_sub(MAX_NODES_PER_CARD);
        if hidden > 0 {
            writeln!(out, "<div class=\"label\">and {} more</div>", hidden)?;
        }
    }
    writeln!(out, "</div>")?;
    writeln!(out, "</article>")?;
    Ok(())
}

const STYLE: &str = "
body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; padding: 24px; background: #10141c; color: #e6edf3; }
.wrap { max-width: 980px; margin: 0 auto; }
.header { border-bottom: 1px solid #2a3140; padding-bottom: 14px; margin-bottom: 18px; }
.title { font-size: 22px; margin: 0 0 8px; }
.sub { font-size: 14px; opacity: .85; }
.badges, .actions { display: flex; gap: 8px; flex-wrap: wrap; margin-top: 8px; }
.badge, .pill { font-size: 12px; padding: 4px 10px; border-radius: 999px; border: 1px solid #3a4252; white-space: nowrap; }
.critical { border-color: #d33; } .serious { border-color: #e80; } .moderate { border-color: #cc0; } .minor { border-color: #0bb; }
.btn { padding: 8px 12px; border-radius: 10px; border: 1px solid #3a4252; color: #e6edf3; text-decoration: none; font-size: 13px; }
.stat { display: inline-block; border: 1px solid #2a3140; border-radius: 12px; padding: 10px 12px; font-size: 14px; margin-bottom: 18px; }
.cards { display: grid; gap: 12px; }
.card { border: 1px solid #2a3140; border-radius: 14px; padding: 14px; }
.top { display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px; }
.rule { font-weight: 700; }
.desc { font-size: 14px; margin-bottom: 10px; }
.meta a { color: #8ab4f8; font-size: 13px; }
.targets { margin-top: 10px; padding-top: 10px; border-top: 1px solid #2a3140; }
.label { font-size: 12px; opacity: .8; margin: 6px 0; }
.code { font-family: ui-monospace, Menlo, Consolas, monospace; font-size: 12px; background: #0a0d13; border-radius: 10px; padding: 10px; margin-bottom: 6px; overflow-x: auto; }
.code pre { margin: 6px 0 0; white-space: pre-wrap; }
.success { border: 1px solid #1c6b45; background: #0f2a1f; border-radius: 14px; padding: 14px; }
";
