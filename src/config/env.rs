use std::path::PathBuf;

pub const ENV_INPUT: &str = "A11Y_INPUT";
pub const ENV_OUTDIR: &str = "A11Y_OUTDIR";
pub const ENV_FIXED_OUTPUT: &str = "A11Y_FIXED_OUTPUT";

/// The environment contract between the supervisor and the batch child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchEnv {
    pub input: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub fixed_output: bool,
}

impl BatchEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            input: non_empty(ENV_INPUT).map(PathBuf::from),
            outdir: non_empty(ENV_OUTDIR).map(PathBuf::from),
            fixed_output: non_empty(ENV_FIXED_OUTPUT)
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
        }
    }

    /// Variables to hand to a child process.
    pub fn to_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(input) = &self.input {
            vars.push((ENV_INPUT, input.display().to_string()));
        }
        if let Some(outdir) = &self.outdir {
            vars.push((ENV_OUTDIR, outdir.display().to_string()));
        }
        if self.fixed_output {
            vars.push((ENV_FIXED_OUTPUT, "1".to_string()));
        }
        vars
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
