pub mod status;
pub mod supervisor;

pub use status::{StatusFile, WorkerState, WorkerStatus, STATUS_FILE};
pub use supervisor::{Supervisor, SupervisorConfig, LOG_FILE, TARGETS_FILE};
