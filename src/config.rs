//! Configuration for the audit run

use crate::error::{HealthError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration for an audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Base URL of the v3 API, without a trailing slash
    pub api_base: String,
    /// Where the CSV summary is written
    pub output_path: PathBuf,
    /// Netrc file consulted when no token is in the environment.
    /// `None` means `~/.netrc`.
    pub netrc_path: Option<PathBuf>,
    /// Branch name that is not called out in the console report
    pub default_branch: String,
    /// Network configuration
    pub network: NetworkConfig,
}

/// Network configuration for API calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Request timeout in seconds. `None` waits as long as the server takes.
    pub timeout_secs: Option<u64>,
    /// Fixed wait after a 429 response before retrying (milliseconds)
    pub rate_limit_delay_ms: u64,
    /// `limit` query parameter for project and build listings
    pub page_limit: u32,
}

pub const DEFAULT_API_BASE: &str = "https://readthedocs.org/api/v3";
pub const DEFAULT_OUTPUT: &str = "health.csv";

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            netrc_path: None,
            default_branch: "master".to_string(),
            network: NetworkConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            rate_limit_delay_ms: 10_000,
            page_limit: 100,
        }
    }
}

impl NetworkConfig {
    /// Get timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Get rate-limit delay as Duration
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }
}

impl HealthConfig {
    /// Create a new builder for HealthConfig
    pub fn builder() -> HealthConfigBuilder {
        HealthConfigBuilder::default()
    }

    /// Load a configuration from a TOML file. Missing keys take their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HealthConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Host name used to look up netrc credentials
    pub fn api_host(&self) -> Result<String> {
        let url = url::Url::parse(&self.api_base)?;
        url.host_str()
            .map(String::from)
            .ok_or_else(|| HealthError::config(format!("API base has no host: {}", self.api_base)))
    }

    /// Resolved netrc location
    pub fn netrc_location(&self) -> Option<PathBuf> {
        self.netrc_path
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".netrc")))
    }

    pub fn validate(&self) -> Result<()> {
        self.api_host()?;
        if self.network.page_limit == 0 {
            return Err(HealthError::config("network.page_limit must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for HealthConfig
#[derive(Default)]
pub struct HealthConfigBuilder {
    api_base: Option<String>,
    output_path: Option<PathBuf>,
    netrc_path: Option<PathBuf>,
    default_branch: Option<String>,
    network: Option<NetworkConfig>,
}

impl HealthConfigBuilder {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into().trim_end_matches('/').to_string());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn netrc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.netrc_path = Some(path.into());
        self
    }

    pub fn default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    pub fn build(self) -> HealthConfig {
        let defaults = HealthConfig::default();
        HealthConfig {
            api_base: self.api_base.unwrap_or(defaults.api_base),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            netrc_path: self.netrc_path,
            default_branch: self.default_branch.unwrap_or(defaults.default_branch),
            network: self.network.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HealthConfig::default();
        assert_eq!(config.api_host().unwrap(), "readthedocs.org");
        assert_eq!(config.output_path, PathBuf::from("health.csv"));
        assert_eq!(config.network.rate_limit_delay(), Duration::from_secs(10));
        assert_eq!(config.network.page_limit, 100);
        assert_eq!(config.network.timeout(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: HealthConfig = toml::from_str(
            r#"
            output_path = "out/health.csv"

            [network]
            rate_limit_delay_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.output_path, PathBuf::from("out/health.csv"));
        assert_eq!(config.network.rate_limit_delay_ms, 250);
        assert_eq!(config.network.timeout(), None);
        assert_eq!(config.default_branch, "master");
    }

    #[test]
    fn test_timeout_from_toml() {
        let config: HealthConfig = toml::from_str(
            r#"
            [network]
            timeout_secs = 45
            "#,
        )
        .unwrap();
        assert_eq!(config.network.timeout(), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_builder_trims_api_base() {
        let config = HealthConfig::builder()
            .api_base("http://127.0.0.1:1234/api/v3/")
            .build();
        assert_eq!(config.api_base, "http://127.0.0.1:1234/api/v3");
        assert_eq!(config.api_host().unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_validate_rejects_zero_page_limit() {
        let mut config = HealthConfig::default();
        config.network.page_limit = 0;
        assert!(config.validate().unwrap_err().is_config());
    }
}
