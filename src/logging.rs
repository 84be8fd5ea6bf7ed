use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

pub fn default_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("v2ex-cli").join("v2ex-cli.log"))
}

/// Sends `tracing` output to the log file. The terminal belongs to the UI,
/// so nothing is written to stdout or stderr.
pub fn init(cfg: &LogConfig) -> Result<PathBuf> {
    let path = match cfg.path.clone() {
        Some(path) => path,
        None => default_path().context("logging: resolve default path")?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("logging: create directory {}", parent.display()))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("logging: open {}", path.display()))?;

    let filter = EnvFilter::try_new(&cfg.level)
        .with_context(|| format!("logging: invalid level {:?}", cfg.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("logging: install subscriber: {err}"))?;

    Ok(path)
}
