use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::WorkerArgs;
use crate::errors::A11yError;
use crate::worker::{Supervisor, SupervisorConfig};

/// Supervise one batch run and return the exit code to leave with.
pub async fn handle_worker(args: WorkerArgs) -> Result<i32, A11yError> {
    let (program, child_args) = match args.command.split_first() {
        Some((program, rest)) => (PathBuf::from(program), rest.to_vec()),
        None => {
            let exe = std::env::current_exe().map_err(|e| {
                A11yError::SupervisorInternal(format!("cannot locate own executable: {}", e))
            })?;
            (exe, vec!["batch".to_string()])
        }
    };

    let config = SupervisorConfig {
        run_dir: PathBuf::from(&args.run_dir),
        program,
        args: child_args,
    };
    info!(run_dir = %args.run_dir, command = %config.command_line(), "Starting worker");

    let mut supervisor = Supervisor::new(config);
    Ok(supervisor.run().await)
}
