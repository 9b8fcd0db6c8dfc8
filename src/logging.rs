//! Tracing setup. The terminal belongs to the widget, so events only go to a
//! file, and only when one is configured.

use crate::error::ConfigError;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GEOLIST_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

pub fn open_log_file(path: &Path) -> Result<File, ConfigError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConfigError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Installs the global subscriber. Returns false when no log file is set
/// or a subscriber was already installed.
pub fn init(log_file: Option<&Path>) -> Result<bool, ConfigError> {
    let Some(path) = log_file else {
        return Ok(false);
    };
    let file = open_log_file(path)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();
    Ok(installed)
}
