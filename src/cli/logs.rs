use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::LogsArgs;
use crate::errors::A11yError;
use crate::worker::LOG_FILE;

pub async fn handle_logs(args: LogsArgs) -> Result<(), A11yError> {
    let log_path = PathBuf::from(&args.run_dir).join(LOG_FILE);
    info!(log = %log_path.display(), "Reading worker log");

    if !log_path.exists() {
        return Err(A11yError::Precondition(format!(
            "No worker log in {}. Path: {}",
            args.run_dir,
            log_path.display()
        )));
    }

    let content = tokio::fs::read(&log_path).await?;
    let text = String::from_utf8_lossy(&content);
    for line in tail(&text, args.lines) {
        println!("{}", line);
    }

    if args.follow {
        use tokio::time::{sleep, Duration};
        let mut last_size = content.len();
        loop {
            sleep(Duration::from_secs(1)).await;
            let new_content = tokio::fs::read(&log_path).await?;
            if new_content.len() > last_size {
                emit_appended(&mut std::io::stdout().lock(), &new_content[last_size..])?;
                last_size = new_content.len();
            } else if new_content.len() < last_size {
                // Truncated or replaced; start over
                last_size = 0;
            }
        }
    }

    Ok(())
}

/// Write newly appended log bytes and flush, so a partial last line shows up
/// before its newline arrives.
fn emit_appended(out: &mut impl Write, bytes: &[u8]) -> std::io::Result<()> {
    write!(out, "{}", String::from_utf8_lossy(bytes))?;
    out.flush()
}

fn tail(text: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}
