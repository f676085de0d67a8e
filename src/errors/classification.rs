use super::types::A11yError;

/// How far a failure reaches: a single target's scan, or the whole supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    PerUrl,
    Run,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub scope: ErrorScope,
}

impl A11yError {
    /// Classify this error to determine its type and whether a batch may continue past it.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Fatal to one target only
            A11yError::Navigation(_) => ErrorClassification {
                error_type: "NavigationError",
                scope: ErrorScope::PerUrl,
            },
            A11yError::EngineInjection(_) => ErrorClassification {
                error_type: "EngineInjectionError",
                scope: ErrorScope::PerUrl,
            },
            A11yError::EngineExecution(_) => ErrorClassification {
                error_type: "EngineExecutionError",
                scope: ErrorScope::PerUrl,
            },
            A11yError::ReportWrite(_) => ErrorClassification {
                error_type: "ReportWriteError",
                scope: ErrorScope::PerUrl,
            },
            A11yError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                scope: ErrorScope::PerUrl,
            },
            A11yError::InvalidTarget(_) => ErrorClassification {
                error_type: "InvalidTargetError",
                scope: ErrorScope::PerUrl,
            },

            // Fatal to the run
            A11yError::Precondition(_) => ErrorClassification {
                error_type: "PreconditionError",
                scope: ErrorScope::Run,
            },
            A11yError::SupervisorInternal(_) => ErrorClassification {
                error_type: "SupervisorInternalError",
                scope: ErrorScope::Run,
            },
            A11yError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                scope: ErrorScope::Run,
            },
            A11yError::Io(_) => ErrorClassification {
                error_type: "IoError",
                scope: ErrorScope::Run,
            },
            A11yError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                scope: ErrorScope::Run,
            },
            A11yError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                scope: ErrorScope::Run,
            },
        }
    }

    /// Process exit code for a run that ends with this error.
    /// 2 = missing or invalid required input, 1 = everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            A11yError::Precondition(_) | A11yError::Config(_) => 2,
            _ => 1,
        }
    }
}
