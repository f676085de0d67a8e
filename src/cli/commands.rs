use clap::{Parser, Subcommand, Args};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "a11y-scan",
    version,
    long_version = LONG_VERSION,
    about = "Accessibility scanner producing JSON, CSV and HTML reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a single URL and write its report triad
    Scan(ScanArgs),
    /// Scan every URL of a target list (driven by A11Y_* environment variables)
    Batch(BatchArgs),
    /// Supervise one batch run inside a job directory
    Worker(WorkerArgs),
    /// Show the status record of a job directory
    Status(StatusArgs),
    /// Print the worker log of a job directory
    Logs(LogsArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
    /// Build an HTML index of the newest month of archived reports
    Index(IndexArgs),
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Page to scan, including its scheme
    pub url: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report root (overrides reports.root)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Name reports without a timestamp
    #[arg(long)]
    pub fixed_output: bool,
}

#[derive(Args, Clone)]
pub struct BatchArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Target list (defaults to A11Y_INPUT, then ./urls.json)
    #[arg(short, long)]
    pub input: Option<String>,
}

#[derive(Args, Clone)]
pub struct WorkerArgs {
    /// Job directory containing urls.json
    #[arg(long)]
    pub run_dir: String,

    /// Child command to supervise, after `--` (defaults to this binary's `batch`)
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Args, Clone)]
pub struct StatusArgs {
    /// Job directory
    #[arg(long)]
    pub run_dir: String,

    /// Output the raw status record
    #[arg(long)]
    pub json: bool,

    /// Seconds after which a non-terminal record is reported as possibly abandoned
    #[arg(long, default_value = "3600")]
    pub stale_after: u64,
}

#[derive(Args, Clone)]
pub struct LogsArgs {
    /// Job directory
    #[arg(long)]
    pub run_dir: String,

    /// Follow log output
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show
    #[arg(short, long, default_value = "100")]
    pub lines: usize,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

#[derive(Args, Clone)]
pub struct IndexArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report root (overrides reports.root)
    #[arg(short, long)]
    pub output: Option<String>,
}
