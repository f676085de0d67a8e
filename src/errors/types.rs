use thiserror::Error;

#[derive(Debug, Error)]
pub enum A11yError {
    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Rule engine injection error: {0}")]
    EngineInjection(String),

    #[error("Rule engine execution error: {0}")]
    EngineExecution(String),

    #[error("Report write error: {0}")]
    ReportWrite(String),

    #[error("Missing required input: {0}")]
    Precondition(String),

    #[error("Supervisor error: {0}")]
    SupervisorInternal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl A11yError {
    /// Wrap an I/O failure on a report file, keeping the offending path in the message.
    pub fn report_write(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        A11yError::ReportWrite(format!("{}: {}", path.display(), err))
    }
}
