use std::path::{Path, PathBuf};

use console::style;
use tracing::info;

use crate::cli::commands::BatchArgs;
use crate::config::{load_config, BatchEnv};
use crate::errors::A11yError;
use crate::models::load_targets;
use crate::reporting::NamingMode;
use crate::utils::{format_duration, pluralize};
use super::scan::build_runner;

const DEFAULT_INPUT: &str = "urls.json";

pub async fn handle_batch(args: BatchArgs, quiet: bool) -> Result<(), A11yError> {
    let env = BatchEnv::from_env();
    let config = load_config(args.config.as_deref().map(Path::new)).await?;

    let input = args
        .input
        .map(PathBuf::from)
        .or(env.input)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let root = env.outdir.unwrap_or_else(|| config.reports.root.clone());
    let naming = if env.fixed_output { NamingMode::Fixed } else { NamingMode::Dated };

    let targets = load_targets(&input).await?;
    info!(
        input = %input.display(),
        targets = targets.len(),
        root = %root.display(),
        naming = ?naming,
        "Starting batch"
    );

    let runner = build_runner(&config, root, naming);
    let summary = runner.run(&targets).await;
    let summary_path = runner.write_summary(&summary).await?;

    if !quiet {
        let elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds().max(0) as u64;
        println!();
        println!(
            "  {} {} scanned, {} failed in {}",
            style("Batch finished:").bold(),
            pluralize(summary.succeeded, "page"),
            summary.failed,
            format_duration(elapsed_ms),
        );
        for outcome in summary.outcomes.iter().filter(|o| !o.ok) {
            println!(
                "    {} {} {}",
                style("\u{2716}").red(),
                outcome.url,
                style(outcome.error.as_deref().unwrap_or("")).dim(),
            );
        }
        println!("  Summary: {}", summary_path.display());
        println!();
    }
    Ok(())
}
