use a11y_scan::cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, 0) => "warn",
        (_, 0) => "info",
        (_, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout carries the report summaries; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let quiet = cli.quiet;
    let result = match cli.command {
        cli::Commands::Scan(args) => cli::scan::handle_scan(args, quiet).await,
        cli::Commands::Batch(args) => cli::batch::handle_batch(args, quiet).await,
        cli::Commands::Worker(args) => match cli::worker::handle_worker(args).await {
            Ok(code) => std::process::exit(code),
            Err(e) => Err(e),
        },
        cli::Commands::Status(args) => cli::status::handle_status(args).await,
        cli::Commands::Logs(args) => cli::logs::handle_logs(args).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
        cli::Commands::Index(args) => cli::index::handle_index(args, quiet).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
