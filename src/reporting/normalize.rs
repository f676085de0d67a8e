use serde::{Deserialize, Serialize};

use crate::models::{Impact, ScanResult};

/// Marker written into the description column when a scan found nothing.
pub const NO_VIOLATIONS_MARKER: &str = "No accessibility violations found";

/// Joins the selectors of one affected node into a single column.
pub const TARGET_DELIMITER: &str = " | ";

/// Number of violations per impact level. Every bucket is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
    pub unknown: usize,
}

impl SeverityCounts {
    pub fn get(&self, impact: Impact) -> usize {
        match impact {
            Impact::Critical => self.critical,
            Impact::Serious => self.serious,
            Impact::Moderate => self.moderate,
            Impact::Minor => self.minor,
            Impact::Unknown => self.unknown,
        }
    }

    fn increment(&mut self, impact: Impact) {
        let slot = match impact {
            Impact::Critical => &mut self.critical,
            Impact::Serious => &mut self.serious,
            Impact::Moderate => &mut self.moderate,
            Impact::Minor => &mut self.minor,
            Impact::Unknown => &mut self.unknown,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        Impact::ALL.iter().map(|i| self.get(*i)).sum()
    }
}

/// Count violations (not nodes) per impact level in one pass.
pub fn severity_counts(result: &ScanResult) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for violation in &result.violations {
        counts.increment(violation.impact);
    }
    counts
}

/// One line of the tabular export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub url: String,
    pub rule_id: String,
    pub impact: String,
    pub description: String,
    pub help_url: String,
    pub target: String,
    pub snippet: String,
}

impl ReportRow {
    pub const COLUMNS: [&'static str; 7] = [
        "url",
        "rule_id",
        "impact",
        "description",
        "help_url",
        "target",
        "snippet",
    ];

    /// Field values in `COLUMNS` order.
    pub fn fields(&self) -> [&str; 7] {
        [
            self.url.as_str(),
            self.rule_id.as_str(),
            self.impact.as_str(),
            self.description.as_str(),
            self.help_url.as_str(),
            self.target.as_str(),
            self.snippet.as_str(),
        ]
    }

    fn sentinel() -> Self {
        Self {
            description: NO_VIOLATIONS_MARKER.to_string(),
            ..Default::default()
        }
    }
}

/// Flatten a result into one row per (violation, affected node).
///
/// A violation without nodes still yields one row with empty target and
/// snippet; a result without violations yields exactly one sentinel row.
pub fn flatten(result: &ScanResult) -> Vec<ReportRow> {
    if result.violations.is_empty() {
        return vec![ReportRow::sentinel()];
    }

    let mut rows = Vec::new();
    for violation in &result.violations {
        let base = ReportRow {
            url: result.url.clone(),
            rule_id: violation.rule_id.clone(),
            impact: violation.impact.as_str().to_string(),
            description: violation.description.clone(),
            help_url: violation.help_url.clone(),
            target: String::new(),
            snippet: String::new(),
        };

        if violation.affected_nodes.is_empty() {
            rows.push(base);
            continue;
        }

        for node in &violation.affected_nodes {
            rows.push(ReportRow {
                target: node.target.join(TARGET_DELIMITER),
                snippet: node.snippet.clone(),
                ..base.clone()
            });
        }
    }
    rows
}
