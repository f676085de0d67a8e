use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use tracing::info;

use crate::browser::{PlaywrightEngine, Scanner};
use crate::cli::commands::ScanArgs;
use crate::config::{load_config, A11yConfig};
use crate::errors::A11yError;
use crate::models::{Impact, ScanResult};
use crate::reporting::{NamingMode, ReportArtifactSet, ReportWriter, SCREENSHOT_DIR};
use crate::pipeline::BatchRunner;
use crate::utils::pluralize;

/// Selectors printed per violation in the terminal summary.
const MAX_TARGETS_SHOWN: usize = 3;

pub async fn handle_scan(args: ScanArgs, quiet: bool) -> Result<(), A11yError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let root = args.output.map(PathBuf::from).unwrap_or_else(|| config.reports.root.clone());
    let naming = if args.fixed_output { NamingMode::Fixed } else { NamingMode::Dated };

    info!(url = %args.url, root = %root.display(), "Starting single scan");
    let runner = build_runner(&config, root, naming);
    let (result, paths) = runner.scan_one(&args.url).await?;

    if !quiet {
        print_summary(&result);
        print_paths(&paths);
        if let Some(shot) = runner.screenshot_path(&args.url).filter(|p| p.exists()) {
            println!("  {} {}", style("Screenshot:").bold(), shot.display());
            println!();
        }
    }
    Ok(())
}

/// Wire the browser engine, scanner and report writer together.
pub fn build_runner(config: &A11yConfig, root: PathBuf, naming: NamingMode) -> BatchRunner {
    let mut engine = PlaywrightEngine::new(config.scanner.clone());
    if config.reports.screenshots {
        engine = engine.with_screenshot_dir(root.join(SCREENSHOT_DIR));
    }
    BatchRunner::new(Scanner::new(Arc::new(engine)), ReportWriter::new(root, naming))
}

pub fn print_summary(result: &ScanResult) {
    println!();
    println!("  {} {}", style("Scanned").bold(), result.url);

    if result.is_clean() {
        println!("  {} No accessibility violations found", style("\u{2714}").green().bold());
        println!();
        return;
    }

    println!(
        "  {} {}",
        style("\u{2716}").red().bold(),
        pluralize(result.total_violations(), "violation"),
    );
    for violation in &result.violations {
        println!(
            "    {} {} {}",
            impact_label(violation.impact),
            style(&violation.rule_id).bold(),
            style(&violation.description).dim(),
        );
        if !violation.help_url.is_empty() {
            println!("        {}", style(&violation.help_url).underlined());
        }
        for node in violation.affected_nodes.iter().take(MAX_TARGETS_SHOWN) {
            println!("        {}", node.target.join(" | "));
        }
        let hidden = violation.affected_nodes.len().saturating_sub(MAX_TARGETS_SHOWN);
        if hidden > 0 {
            println!("        {}", style(format!("... and {} more", hidden)).dim());
        }
    }
    println!();
}

pub fn print_paths(paths: &ReportArtifactSet) {
    println!("  {}", style("Reports:").bold());
    for path in paths.all() {
        println!("    {}", path.display());
    }
    println!();
}

fn impact_label(impact: Impact) -> console::StyledObject<String> {
    let label = format!("[{}]", impact);
    match impact {
        Impact::Critical => style(label).red().bold(),
        Impact::Serious => style(label).red(),
        Impact::Moderate => style(label).yellow(),
        Impact::Minor => style(label).cyan(),
        Impact::Unknown => style(label).dim(),
    }
}
