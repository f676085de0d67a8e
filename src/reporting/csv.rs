use crate::errors::A11yError;
use super::formatter::{ReportContext, ReportFormatter};
use super::normalize::ReportRow;

/// One line per flattened row, fixed column order.
pub struct CsvFormatter;

impl ReportFormatter for CsvFormatter {
    fn format(&self, ctx: &ReportContext<'_>) -> Result<String, A11yError> {
        Ok(render_csv(ctx.rows))
    }
}

pub fn render_csv(rows: &[ReportRow]) -> String {
    let mut out = String::new();
    out.push_str(&ReportRow::COLUMNS.join(","));
    out.push('\n');
    for row in rows {
        let line: Vec<String> = row.fields().iter().map(|f| csv_escape(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_escape(s: &str) -> String {
    let needs_quoting = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');
    let has_formula_prefix = matches!(s.as_bytes().first(), Some(b'=' | b'+' | b'-' | b'@' | b'\t' | b'\r'));

    if has_formula_prefix {
        // Leading quote keeps spreadsheets from evaluating the cell
        format!("\"'{}\"", s.replace('"', "\"\""))
    } else if needs_quoting {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
