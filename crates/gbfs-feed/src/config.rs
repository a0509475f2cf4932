//! Configuration for the feed cache.
//!
//! Thresholds and endpoints are plain values handed to the coordinator at
//! construction -- there is no global mutable state. Configuration can be
//! loaded from a YAML file; the endpoint prefix can additionally be
//! overridden through the `GBFS_API_PREFIX` environment variable, which is
//! convenient when pointing a deployment at a different city's feed.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The staleness thresholds are not ordered.
    #[error("soft threshold ({soft:?}) must be strictly below hard threshold ({hard:?})")]
    InvalidThresholds {
        /// The configured soft threshold.
        soft: Duration,
        /// The configured hard threshold.
        hard: Duration,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Feed cache configuration.
///
/// All fields have defaults matching the Oslo city bike deployment, so an
/// empty document (or no file at all) yields a working configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Endpoint prefix of the upstream feed, without a trailing slash.
    /// The two document paths are appended to this.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Staleness above which a background refresh is triggered while the
    /// current data is still served (seconds).
    #[serde(default = "default_soft_threshold_secs")]
    pub soft_threshold_secs: u64,

    /// Staleness above which readers block until a refresh completes
    /// (seconds).
    #[serde(default = "default_hard_threshold_secs")]
    pub hard_threshold_secs: u64,

    /// Upper bound applied to each upstream HTTP request (seconds).
    #[serde(default = "default_network_timeout_secs")]
    pub network_timeout_secs: u64,

    /// Value sent in the `Client-Identifier` request header, identifying
    /// this consumer to the feed operator.
    #[serde(default = "default_client_identifier")]
    pub client_identifier: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            soft_threshold_secs: default_soft_threshold_secs(),
            hard_threshold_secs: default_hard_threshold_secs(),
            network_timeout_secs: default_network_timeout_secs(),
            client_identifier: default_client_identifier(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidThresholds`] if the thresholds are not ordered.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::InvalidThresholds`] if the thresholds are not ordered.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThresholds`] unless
    /// `soft_threshold < hard_threshold`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.soft_threshold_secs >= self.hard_threshold_secs {
            return Err(ConfigError::InvalidThresholds {
                soft: self.soft_threshold(),
                hard: self.hard_threshold(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides (`GBFS_API_PREFIX`).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(prefix) = std::env::var("GBFS_API_PREFIX") {
            self.api_prefix = prefix;
        }
    }

    /// Staleness above which a background refresh is triggered.
    pub const fn soft_threshold(&self) -> Duration {
        Duration::from_secs(self.soft_threshold_secs)
    }

    /// Staleness above which readers block until a refresh completes.
    pub const fn hard_threshold(&self) -> Duration {
        Duration::from_secs(self.hard_threshold_secs)
    }

    /// Upper bound applied to each upstream HTTP request.
    pub const fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs)
    }
}

fn default_api_prefix() -> String {
    "https://gbfs.urbansharing.com/oslobysykkel.no".to_owned()
}

const fn default_soft_threshold_secs() -> u64 {
    10
}

const fn default_hard_threshold_secs() -> u64 {
    60
}

const fn default_network_timeout_secs() -> u64 {
    30
}

fn default_client_identifier() -> String {
    "gbfs-feed-cache".to_owned()
}
