use std::path::PathBuf;

use crate::cli::commands::ValidateArgs;
use crate::config::parse_config;
use crate::errors::A11yError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), A11yError> {
    let path = PathBuf::from(&args.config);
    let config = parse_config(&path).await?;
    println!("Configuration is valid: {}", args.config);
    println!("  engine:  {}", config.scanner.engine_url);
    println!("  reports: {}", config.reports.root.display());
    Ok(())
}
