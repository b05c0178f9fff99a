//! File logging via `env_logger`.
//!
//! The terminal belongs to the UI, so records go to a file. Default levels are
//! `warn` globally and `info` for this workspace's crates; `RUST_LOG` overrides.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;

const OWN_TARGETS: [&str; 2] = ["candlewatch_core", "candlewatch_tui"];

/// `<data-local-dir>/candlewatch/candlewatch.log`, or `./candlewatch.log`
/// when the platform has no data directory.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("candlewatch"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("candlewatch.log")
}

/// Build the logger configuration without installing it.
pub fn builder(rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter(None, LevelFilter::Warn);
    for target in OWN_TARGETS {
        builder.filter(Some(target), LevelFilter::Info);
    }
    if let Some(filters) = rust_log.filter(|f| !f.trim().is_empty()) {
        builder.parse_filters(filters);
    }
    builder.format_timestamp_millis();
    builder
}

/// Append log records to `path`, creating parent directories as needed.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let rust_log = std::env::var("RUST_LOG").ok();
    builder(rust_log.as_deref())
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("install logger")?;
    Ok(())
}
