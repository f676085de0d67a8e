use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::errors::A11yError;

pub const STATUS_FILE: &str = "status.json";

/// Lifecycle of one supervised run: `starting → running → completed | failed`,
/// or `starting → failed` when the run never gets going.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Starting,
    Running,
    Completed,
    Failed,
}

impl WorkerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Completed | WorkerState::Failed)
    }

    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (WorkerState::Starting, WorkerState::Running)
                | (WorkerState::Starting, WorkerState::Failed)
                | (WorkerState::Running, WorkerState::Completed)
                | (WorkerState::Running, WorkerState::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Starting => "starting",
            WorkerState::Running => "running",
            WorkerState::Completed => "completed",
            WorkerState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a supervised run, as published to `status.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkerStatus {
    pub state: WorkerState,
    pub run_id: String,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    /// Informational only.
    pub command: Option<String>,
    pub pid: Option<u32>,
    /// Set only once the run is terminal.
    pub returncode: Option<i32>,
    pub error: Option<String>,
    pub run_dir: PathBuf,
    pub input: PathBuf,
}

impl WorkerStatus {
    pub fn new(run_dir: &Path, input: &Path) -> Self {
        Self {
            state: WorkerState::Starting,
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Local::now(),
            finished_at: None,
            command: None,
            pid: None,
            returncode: None,
            error: None,
            run_dir: run_dir.to_path_buf(),
            input: input.to_path_buf(),
        }
    }

    /// Move to `next`, refusing anything that would run the lifecycle backwards.
    pub fn transition(&mut self, next: WorkerState) -> Result<(), A11yError> {
        if !self.state.can_transition_to(next) {
            return Err(A11yError::SupervisorInternal(format!(
                "illegal status transition {} -> {}",
                self.state, next
            )));
        }
        self.state = next;
        if next.is_terminal() {
            self.finished_at = Some(Local::now());
        }
        Ok(())
    }

    /// Mark the run failed from whichever non-terminal state it is in.
    pub fn fail(&mut self, error: impl Into<String>) {
        if !self.state.is_terminal() {
            self.state = WorkerState::Failed;
            self.finished_at = Some(Local::now());
        }
        self.error = Some(error.into());
    }

    /// A non-terminal record older than `ceiling` most likely belongs to a
    /// supervisor that was killed out-of-band. Advisory only.
    pub fn is_probably_abandoned(&self, now: DateTime<Local>, ceiling: chrono::Duration) -> bool {
        !self.state.is_terminal() && now.signed_duration_since(self.started_at) > ceiling
    }
}

/// The single-writer status record of a run directory.
pub struct StatusFile {
    path: PathBuf,
}

impl StatusFile {
    pub fn new(run_dir: &Path) -> Self {
        Self { path: run_dir.join(STATUS_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the record through a temp file and rename, so readers never see a torn write.
    pub async fn write(&self, status: &WorkerStatus) -> Result<(), A11yError> {
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(status)?;
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub async fn read(&self) -> Result<WorkerStatus, A11yError> {
        if !self.path.exists() {
            return Err(A11yError::Precondition(format!(
                "no status record at {}",
                self.path.display()
            )));
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        use WorkerState::*;
        assert!(Starting.can_transition_to(Running));
        assert!(Starting.can_transition_to(Failed));
        assert!(Running.can_transition_to(Completed));
        assert!(Running.can_transition_to(Failed));

        assert!(!Starting.can_transition_to(Completed));
        assert!(!Running.can_transition_to(Starting));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Running));
    }

    #[test]
    fn test_transition_sets_finished_at_on_terminal() {
        let mut status = WorkerStatus::new(Path::new("/tmp/run"), Path::new("/tmp/run/urls.json"));
        status.transition(WorkerState::Running).unwrap();
        assert!(status.finished_at.is_none());
        status.transition(WorkerState::Completed).unwrap();
        assert!(status.finished_at.is_some());
        assert!(status.transition(WorkerState::Failed).is_err());
        assert_eq!(status.state, WorkerState::Completed);
    }

    #[test]
    fn test_fail_keeps_terminal_state() {
        let mut status = WorkerStatus::new(Path::new("r"), Path::new("r/urls.json"));
        status.fail("boom");
        assert_eq!(status.state, WorkerState::Failed);
        assert_eq!(status.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_abandoned_only_when_stale_and_non_terminal() {
        let mut status = WorkerStatus::new(Path::new("r"), Path::new("r/urls.json"));
        status.transition(WorkerState::Running).unwrap();
        let later = status.started_at + chrono::Duration::hours(3);
        assert!(status.is_probably_abandoned(later, chrono::Duration::hours(2)));
        assert!(!status.is_probably_abandoned(later, chrono::Duration::hours(4)));

        status.transition(WorkerState::Completed).unwrap();
        assert!(!status.is_probably_abandoned(later, chrono::Duration::hours(2)));
    }

    #[test]
    fn test_status_serializes_lowercase_state() {
        let status = WorkerStatus::new(Path::new("r"), Path::new("r/urls.json"));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "starting");
        assert!(json["returncode"].is_null());
    }

    #[tokio::test]
    async fn test_status_file_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = StatusFile::new(dir.path());
        let mut status = WorkerStatus::new(dir.path(), &dir.path().join("urls.json"));
        file.write(&status).await.unwrap();
        status.transition(WorkerState::Running).unwrap();
        file.write(&status).await.unwrap();

        let back = file.read().await.unwrap();
        assert_eq!(back.state, WorkerState::Running);
        assert_eq!(back.run_id, status.run_id);
        assert!(!dir.path().join("status.json.tmp").exists());
    }
}
