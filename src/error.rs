//! Error types for the health audit

use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, HealthError>;

/// Main error type for audit operations
#[derive(Error, Debug)]
pub enum HealthError {
    #[error(
        "No API token! Set READTHEDOCS_TOKEN or add a `machine {host}` entry with a password to {netrc}"
    )]
    MissingToken { host: String, netrc: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("More than {limit} projects ({count} reported); the project listing no longer fits in one page")]
    PaginationLimit { count: u64, limit: u32 },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl HealthError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether this error is a configuration problem rather than a data or network failure
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingToken { .. } | Self::ConfigError(_) | Self::TomlError(_)
        )
    }
}
