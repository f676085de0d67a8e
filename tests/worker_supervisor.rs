#![cfg(unix)]

use a11y_scan::worker::{StatusFile, Supervisor, SupervisorConfig, WorkerState, LOG_FILE, TARGETS_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn shell(run_dir: &Path, script: &str) -> SupervisorConfig {
    SupervisorConfig {
        run_dir: run_dir.to_path_buf(),
        program: PathBuf::from("/bin/sh"),
        args: vec!["-c".to_string(), script.to_string()],
    }
}

fn job_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(TARGETS_FILE), r#"["https://example.com"]"#).unwrap();
    tmp
}

async fn read_status(dir: &Path) -> a11y_scan::worker::WorkerStatus {
    StatusFile::new(dir).read().await.unwrap()
}

#[tokio::test]
async fn test_missing_input_fails_without_spawning() {
    let tmp = TempDir::new().unwrap();
    let marker = tmp.path().join("spawned");
    let mut supervisor = Supervisor::new(shell(tmp.path(), &format!("touch {}", marker.display())));

    let code = supervisor.run().await;

    assert_eq!(code, 2);
    assert_eq!(supervisor.status().state, WorkerState::Failed);
    let status = read_status(tmp.path()).await;
    assert_eq!(status.state, WorkerState::Failed);
    assert!(status.error.unwrap().contains("urls.json"));
    assert!(status.pid.is_none());
    assert!(status.finished_at.is_some());
    assert!(!marker.exists());
    assert!(!tmp.path().join(LOG_FILE).exists());
}

#[tokio::test]
async fn test_successful_child_completes() {
    let tmp = job_dir();
    let mut supervisor = Supervisor::new(shell(tmp.path(), "exit 0"));

    assert_eq!(supervisor.run().await, 0);

    let status = read_status(tmp.path()).await;
    assert_eq!(status.state, WorkerState::Completed);
    assert_eq!(status.returncode, Some(0));
    assert!(status.pid.is_some());
    assert!(status.error.is_none());
    assert!(status.finished_at.unwrap() >= status.started_at);
    assert_eq!(status.command.as_deref(), Some("/bin/sh -c exit 0"));

    // In-memory record matches what was published
    let live = supervisor.status();
    assert_eq!(live.state, status.state);
    assert_eq!(live.run_id, status.run_id);
    assert_eq!(live.pid, status.pid);
    assert_eq!(live.returncode, status.returncode);
    assert_eq!(live.input, tmp.path().join(TARGETS_FILE));
}

#[tokio::test]
async fn test_child_exit_code_is_mirrored() {
    let tmp = job_dir();
    let mut supervisor = Supervisor::new(shell(tmp.path(), "exit 3"));

    assert_eq!(supervisor.run().await, 3);

    let status = read_status(tmp.path()).await;
    assert_eq!(status.state, WorkerState::Failed);
    assert_eq!(status.returncode, Some(3));
    assert!(status.error.is_some());
}

#[tokio::test]
async fn test_unlaunchable_child_is_internal_failure() {
    let tmp = job_dir();
    let mut supervisor = Supervisor::new(SupervisorConfig {
        run_dir: tmp.path().to_path_buf(),
        program: PathBuf::from("/nonexistent/a11y-batch"),
        args: vec![],
    });

    assert_eq!(supervisor.run().await, 1);

    let status = read_status(tmp.path()).await;
    assert_eq!(status.state, WorkerState::Failed);
    assert!(status.returncode.is_none());
    assert!(status.error.unwrap().contains("/nonexistent/a11y-batch"));
}

#[tokio::test]
async fn test_signal_killed_child() {
    let tmp = job_dir();
    let mut supervisor = Supervisor::new(shell(tmp.path(), "kill -TERM $$"));

    assert_eq!(supervisor.run().await, 1);

    let status = read_status(tmp.path()).await;
    assert_eq!(status.state, WorkerState::Failed);
    assert_eq!(status.returncode, Some(-15));
}

#[tokio::test]
async fn test_log_captures_both_streams_and_appends() {
    let tmp = job_dir();
    fs::write(tmp.path().join(LOG_FILE), "previous run\n").unwrap();
    let mut supervisor = Supervisor::new(shell(tmp.path(), "echo to-stdout; echo to-stderr 1>&2"));

    assert_eq!(supervisor.run().await, 0);

    let log = fs::read_to_string(tmp.path().join(LOG_FILE)).unwrap();
    assert!(log.starts_with("previous run\n"));
    assert!(log.contains("to-stdout"));
    assert!(log.contains("to-stderr"));
}

#[tokio::test]
async fn test_child_receives_batch_environment() {
    let tmp = job_dir();
    let mut supervisor = Supervisor::new(shell(
        tmp.path(),
        r#"echo "input=$A11Y_INPUT"; echo "outdir=$A11Y_OUTDIR"; echo "fixed=$A11Y_FIXED_OUTPUT""#,
    ));

    assert_eq!(supervisor.run().await, 0);

    let log = fs::read_to_string(tmp.path().join(LOG_FILE)).unwrap();
    assert!(log.contains(&format!("input={}", tmp.path().join(TARGETS_FILE).display())));
    assert!(log.contains(&format!("outdir={}", tmp.path().display())));
    assert!(log.contains("fixed=1"));
}

#[tokio::test]
async fn test_polled_states_never_go_backwards() {
    let tmp = job_dir();
    let dir = tmp.path().to_path_buf();
    let mut supervisor = Supervisor::new(shell(&dir, "sleep 1"));
    let handle = tokio::spawn(async move { supervisor.run().await });

    let file = StatusFile::new(tmp.path());
    let mut seen: Vec<WorkerState> = Vec::new();
    while !handle.is_finished() {
        if let Ok(status) = file.read().await {
            if seen.last() != Some(&status.state) {
                seen.push(status.state);
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(handle.await.unwrap(), 0);
    let last = file.read().await.unwrap().state;
    if seen.last() != Some(&last) {
        seen.push(last);
    }

    let rank = |s: &WorkerState| match s {
        WorkerState::Starting => 0,
        WorkerState::Running => 1,
        WorkerState::Completed | WorkerState::Failed => 2,
    };
    assert!(seen.windows(2).all(|w| rank(&w[0]) < rank(&w[1])), "{:?}", seen);
    assert_eq!(seen.last(), Some(&WorkerState::Completed));
    assert!(seen.contains(&WorkerState::Running));
}
