use std::path::Path;
use crate::errors::A11yError;
use super::types::A11yConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<A11yConfig, A11yError> {
    if !path.exists() {
        return Err(A11yError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(A11yError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Load the config file when one is given, defaults otherwise.
pub async fn load_config(path: Option<&Path>) -> Result<A11yConfig, A11yError> {
    match path {
        Some(p) => parse_config(p).await,
        None => Ok(A11yConfig::default()),
    }
}

pub fn parse_config_str(content: &str) -> Result<A11yConfig, A11yError> {
    // An empty file is a valid, all-defaults config
    if content.trim().is_empty() {
        return Ok(A11yConfig::default());
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_schema(&yaml)?;

    let config: A11yConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), A11yError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| A11yError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| A11yError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; typed parsing and semantic checks decide
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &A11yConfig) -> Result<(), A11yError> {
    let scanner = &config.scanner;

    if scanner.engine_url.trim().is_empty() {
        return Err(A11yError::Config("scanner.engine_url must not be empty".into()));
    }
    if scanner.navigation_timeout_secs == 0 {
        return Err(A11yError::Config("scanner.navigation_timeout_secs must be greater than 0".into()));
    }
    if scanner.engine_timeout_secs == 0 {
        return Err(A11yError::Config("scanner.engine_timeout_secs must be greater than 0".into()));
    }
    if scanner.node_binary.trim().is_empty() {
        return Err(A11yError::Config("scanner.node_binary must not be empty".into()));
    }
    if let Some(tags) = &scanner.tags {
        if tags.iter().any(|t| t.trim().is_empty()) {
            return Err(A11yError::Config("scanner.tags must not contain empty entries".into()));
        }
    }

    Ok(())
}
