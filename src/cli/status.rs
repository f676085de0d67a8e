use std::path::Path;

use chrono::Local;
use console::style;

use crate::cli::commands::StatusArgs;
use crate::errors::A11yError;
use crate::worker::{StatusFile, WorkerState};

pub async fn handle_status(args: StatusArgs) -> Result<(), A11yError> {
    let status = StatusFile::new(Path::new(&args.run_dir)).read().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let state = match status.state {
        WorkerState::Completed => style(status.state.as_str()).green().bold(),
        WorkerState::Failed => style(status.state.as_str()).red().bold(),
        _ => style(status.state.as_str()).yellow().bold(),
    };
    println!("Run:      {}", status.run_id);
    println!("State:    {}", state);
    println!("Started:  {}", status.started_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(finished) = status.finished_at {
        println!("Finished: {}", finished.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(command) = &status.command {
        println!("Command:  {}", command);
    }
    if let Some(pid) = status.pid {
        println!("PID:      {}", pid);
    }
    if let Some(code) = status.returncode {
        println!("Exit:     {}", code);
    }
    if let Some(error) = &status.error {
        println!("Error:    {}", style(error).red());
    }

    let ceiling = chrono::Duration::seconds(args.stale_after as i64);
    if status.is_probably_abandoned(Local::now(), ceiling) {
        println!(
            "{} still {} after {}s; the worker may have died without recording an outcome",
            style("warning:").yellow().bold(),
            status.state,
            args.stale_after,
        );
    }
    Ok(())
}
