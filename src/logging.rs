use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "calgrid.log";

/// Send `tracing` output to `<dir>/calgrid.log`. The terminal is owned by the
/// TUI, so nothing is written to stderr. `RUST_LOG` wins over `level`.
pub fn init(dir: &Path, level: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("Failed to open {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to install logger: {e}"))?;

    Ok(path)
}
