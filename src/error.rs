use crate::core::geo::GeoId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-success status; `body` is its raw text.
    #[error("server rejected request (status {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the user in the error alert.
    pub fn response_text(&self) -> &str {
        match self {
            Self::Rejected { body, .. } => body,
            Self::Transport(message) | Self::Decode(message) => message,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("entry {0} already exists")]
    DuplicateId(GeoId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid suggestion list: {0}")]
    Suggestions(#[from] serde_json::Error),
    #[error("invalid geography data: {0}")]
    GeoData(String),
    #[error("failed to open log file {path}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid server url '{0}': expected http:// or https://")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn alert_text_is_raw_body() {
        let err = ApiError::Rejected {
            status: 400,
            body: "Unknown state".to_string(),
        };
        assert_eq!(err.response_text(), "Unknown state");
        assert!(err.to_string().contains("400"));
    }
}
