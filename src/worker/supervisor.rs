use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{error, info, warn};

use crate::config::BatchEnv;
use crate::errors::A11yError;
use super::status::{StatusFile, WorkerState, WorkerStatus};

pub const TARGETS_FILE: &str = "urls.json";
pub const LOG_FILE: &str = "worker.log";

/// Exit code when the job directory lacks its target list.
pub const EXIT_MISSING_INPUT: i32 = 2;
/// Exit code for failures of the supervisor itself.
pub const EXIT_INTERNAL: i32 = 1;

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Job directory; holds `urls.json` and receives status, log and reports.
    pub run_dir: PathBuf,
    /// Child program and its arguments.
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl SupervisorConfig {
    pub fn input_path(&self) -> PathBuf {
        self.run_dir.join(TARGETS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.run_dir.join(LOG_FILE)
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Launches one scan child, waits for it, and publishes every lifecycle step to `status.json`.
///
/// Status writes happen before the step they announce (`starting`, `running`)
/// and after the outcome they report (`completed`, `failed`), so a poller can
/// never see the lifecycle run backwards.
pub struct Supervisor {
    config: SupervisorConfig,
    status_file: StatusFile,
    status: WorkerStatus,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let status_file = StatusFile::new(&config.run_dir);
        let status = WorkerStatus::new(&config.run_dir, &config.input_path());
        Self { config, status_file, status }
    }

    pub fn status(&self) -> &WorkerStatus {
        &self.status
    }

    /// Run to completion and return the process exit code to use:
    /// the child's own code, 2 for missing input, 1 for supervisor failures.
    pub async fn run(&mut self) -> i32 {
        match self.supervise().await {
            Ok(code) => code,
            Err(e) => {
                error!(run_id = %self.status.run_id, error = %e, "Supervisor failed");
                self.status.fail(e.to_string());
                if let Err(write_err) = self.publish().await {
                    warn!(error = %write_err, "Could not record final failed status");
                }
                e.exit_code().max(EXIT_INTERNAL)
            }
        }
    }

    async fn supervise(&mut self) -> Result<i32, A11yError> {
        tokio::fs::create_dir_all(&self.config.run_dir).await.map_err(|e| {
            A11yError::SupervisorInternal(format!(
                "cannot create run directory {}: {}",
                self.config.run_dir.display(),
                e
            ))
        })?;

        info!(run_id = %self.status.run_id, run_dir = %self.config.run_dir.display(), "Worker starting");
        self.publish().await?;

        let input = self.config.input_path();
        if !input.exists() {
            warn!(input = %input.display(), "Target list missing, not starting a scan");
            self.status.error = Some(format!("{} not found in run directory.", TARGETS_FILE));
            self.status.transition(WorkerState::Failed)?;
            self.publish().await?;
            return Ok(EXIT_MISSING_INPUT);
        }

        self.status.command = Some(self.config.command_line());
        self.status.transition(WorkerState::Running)?;
        self.publish().await?;

        let exit = self.spawn_and_wait(&input).await?;
        let code = exit_code(&exit);

        self.status.returncode = Some(code);
        if exit.success() {
            self.status.transition(WorkerState::Completed)?;
        } else {
            self.status.error = Some(format!("scan process exited with status {}", code));
            self.status.transition(WorkerState::Failed)?;
        }
        self.publish().await?;

        info!(
            run_id = %self.status.run_id,
            state = %self.status.state,
            returncode = code,
            "Worker finished"
        );

        Ok(match exit.code() {
            Some(c) => c,
            None => EXIT_INTERNAL,
        })
    }

    async fn spawn_and_wait(&mut self, input: &Path) -> Result<ExitStatus, A11yError> {
        let log_path = self.config.log_path();
        let log = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| A11yError::SupervisorInternal(format!(
                "cannot open log file {}: {}",
                log_path.display(),
                e
            )))?;
        let log_err = log.try_clone().map_err(|e| {
            A11yError::SupervisorInternal(format!("cannot share log file handle: {}", e))
        })?;

        let env = BatchEnv {
            input: Some(input.to_path_buf()),
            outdir: Some(self.config.run_dir.clone()),
            fixed_output: true,
        };

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .envs(env.to_vars())
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err))
            .spawn()
            .map_err(|e| A11yError::SupervisorInternal(format!(
                "failed to start '{}': {}",
                self.config.command_line(),
                e
            )))?;

        self.status.pid = child.id();
        info!(pid = ?self.status.pid, command = %self.config.command_line(), "Scan process started");
        self.publish().await?;

        child
            .wait()
            .await
            .map_err(|e| A11yError::SupervisorInternal(format!("failed waiting for scan process: {}", e)))
    }

    async fn publish(&self) -> Result<(), A11yError> {
        self.status_file.write(&self.status).await.map_err(|e| {
            A11yError::SupervisorInternal(format!(
                "cannot write {}: {}",
                self.status_file.path().display(),
                e
            ))
        })
    }
}

/// The child's exit code, or the negated signal number when it was killed.
#[cfg(unix)]
fn exit_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => -signal,
        (None, None) => EXIT_INTERNAL,
    }
}

#[cfg(not(unix))]
fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(EXIT_INTERNAL)
}
