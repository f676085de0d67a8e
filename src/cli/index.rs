use std::path::{Path, PathBuf};

use console::style;

use crate::cli::commands::IndexArgs;
use crate::config::load_config;
use crate::errors::A11yError;
use crate::reporting::write_index;

pub async fn handle_index(args: IndexArgs, quiet: bool) -> Result<(), A11yError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let root = args.output.map(PathBuf::from).unwrap_or(config.reports.root);

    let (month_index, root_index) = write_index(&root).await?;
    if !quiet {
        println!("  {}", style("Index:").bold());
        println!("    {}", month_index.display());
        println!("    {}", root_index.display());
    }
    Ok(())
}
