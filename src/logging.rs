use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;

/// Routes `log` output to a file so the alternate screen stays clean.
/// `RUST_LOG` overrides the configured level.
pub fn init(level: &str) -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aptiq");
    fs::create_dir_all(&dir)?;
    let path = dir.join("aptiq.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filter)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    log::info!("logging to {}", path.display());
    Ok(path)
}
