use crate::api::local::GeoData;
use crate::core::suggestions::SuggestionList;
use crate::error::ConfigError;
use crate::ui::style::Color;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const HOVER_HIGHLIGHT: Color = Color::Yellow;

/// What happens to a hidden entry when its removal request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalPolicy {
    /// Stays hidden; the server may still hold it.
    #[default]
    FireAndForget,
    /// Shown again.
    Rollback,
}

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "geolist", version, about = "Pick state/county pairs against a geo server")]
pub struct Cli {
    /// Base URL serving register-geo, drop-geo and counties-list.
    #[arg(long, env = "GEOLIST_SERVER")]
    pub server: Option<String>,

    /// YAML config file; command line values win over it.
    #[arg(long, short, env = "GEOLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve requests from an in-process backend instead of a server.
    #[arg(long)]
    pub offline: bool,

    /// Geography JSON for the offline backend.
    #[arg(long, env = "GEOLIST_GEO_DATA")]
    pub geo_data: Option<PathBuf>,

    /// JSON array of known state names.
    #[arg(long, env = "GEOLIST_STATES")]
    pub states: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub removal_policy: Option<RemovalPolicy>,

    #[arg(long, env = "GEOLIST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub server: Option<String>,
    pub offline: Option<bool>,
    pub geo_data: Option<PathBuf>,
    /// Inline state list.
    pub states: Option<Vec<String>>,
    /// Path to a JSON array of state names.
    pub states_file: Option<PathBuf>,
    pub removal_policy: Option<RemovalPolicy>,
    pub log_file: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    pub highlight: Option<Color>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = read_file(path)?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Http { base_url: String, timeout: Duration },
    Local { geo_data: Option<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    /// `None` means the backend decides (US states for HTTP, the data's
    /// states offline).
    pub known_states: Option<SuggestionList>,
    pub removal_policy: RemovalPolicy,
    pub highlight: Color,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let offline = cli.offline || file.offline.unwrap_or(false);
        let backend = if offline {
            Backend::Local {
                geo_data: cli.geo_data.or(file.geo_data),
            }
        } else {
            let base_url = cli
                .server
                .or(file.server)
                .unwrap_or_else(|| DEFAULT_SERVER.to_string());
            validate_url(&base_url)?;
            let timeout_ms = cli
                .timeout_ms
                .or(file.timeout_ms)
                .unwrap_or(DEFAULT_TIMEOUT_MS);
            Backend::Http {
                base_url,
                timeout: Duration::from_millis(timeout_ms),
            }
        };

        let known_states = match (cli.states.or(file.states_file), file.states) {
            (Some(path), _) => Some(SuggestionList::from_json(&read_file(&path)?)?),
            (None, Some(inline)) => Some(SuggestionList::new(inline)),
            (None, None) => None,
        };

        Ok(Self {
            backend,
            known_states,
            removal_policy: cli
                .removal_policy
                .or(file.removal_policy)
                .unwrap_or_default(),
            highlight: file.highlight.unwrap_or(HOVER_HIGHLIGHT),
            log_file: cli.log_file.or(file.log_file),
        })
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl(url.to_string()))
    }
}

pub fn read_geo_data(path: &Path) -> Result<GeoData, ConfigError> {
    GeoData::from_json(&read_file(path)?)
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
