pub mod batch;
pub mod state;

pub use batch::{BatchRunner, SUMMARY_FILE};
pub use state::{BatchSummary, TargetOutcome};
