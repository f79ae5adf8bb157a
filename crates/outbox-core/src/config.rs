//! Configuration module for Outbox.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, and defaults matching the development
//! backend the original deployment shipped against.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::EndpointUrl;

/// Top-level configuration for Outbox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub delivery: DeliveryConfig,
    pub queue: QueueConfig,
    pub connectivity: ConnectivityConfig,
    pub logging: LoggingConfig,
}

/// Delivery protocol settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Candidate endpoints in priority order; the first to accept a
    /// submission wins.
    pub endpoints: Vec<String>,
    /// Endpoint for the read-only remote listing used by `status`.
    pub listing_endpoint: Option<String>,
    /// Seconds allowed per endpoint attempt before it counts as unreachable.
    pub request_timeout: u64,
}

/// Durable queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Path of the queue blob file. A leading `~` expands to the home
    /// directory at runtime.
    pub path: PathBuf,
}

/// Connectivity probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// URL probed to detect that the transport path is usable again.
    pub probe_url: String,
    /// Seconds between probes.
    pub probe_interval: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/outbox/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("outbox")
            .join("config.yaml")
    }

    /// The candidate endpoints parsed into validated URLs, in priority order.
    pub fn endpoints(&self) -> Result<Vec<EndpointUrl>, crate::domain::DomainError> {
        self.delivery
            .endpoints
            .iter()
            .map(|s| EndpointUrl::parse(s))
            .collect()
    }

    /// The listing endpoint parsed into a validated URL, when configured.
    pub fn listing_endpoint(&self) -> Result<Option<EndpointUrl>, crate::domain::DomainError> {
        self.delivery
            .listing_endpoint
            .as_deref()
            .map(EndpointUrl::parse)
            .transpose()
    }

    /// Queue blob path with `~` expanded against the home directory.
    pub fn queue_path(&self) -> PathBuf {
        expand_tilde(&self.queue.path)
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://localhost:5000/api/submit-news".to_string()],
            listing_endpoint: Some("http://localhost:5000/api/submissions".to_string()),
            request_timeout: 10,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("outbox")
                .join("queue.json"),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_url: "http://localhost:5000/api/test".to_string(),
            probe_interval: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"delivery.request_timeout"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- delivery ---
        if self.delivery.endpoints.is_empty() {
            errors.push(ValidationError {
                field: "delivery.endpoints".into(),
                message: "at least one candidate endpoint is required".into(),
            });
        }
        for endpoint in &self.delivery.endpoints {
            if let Err(e) = EndpointUrl::parse(endpoint) {
                errors.push(ValidationError {
                    field: "delivery.endpoints".into(),
                    message: e.to_string(),
                });
            }
        }
        if let Some(listing) = &self.delivery.listing_endpoint {
            if let Err(e) = EndpointUrl::parse(listing) {
                errors.push(ValidationError {
                    field: "delivery.listing_endpoint".into(),
                    message: e.to_string(),
                });
            }
        }
        if self.delivery.request_timeout == 0 {
            errors.push(ValidationError {
                field: "delivery.request_timeout".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- queue ---
        if self.queue.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "queue.path".into(),
                message: "must not be empty".into(),
            });
        }

        // --- connectivity ---
        if let Err(e) = EndpointUrl::parse(&self.connectivity.probe_url) {
            errors.push(ValidationError {
                field: "connectivity.probe_url".into(),
                message: e.to_string(),
            });
        }
        if self.connectivity.probe_interval == 0 {
            errors.push(ValidationError {
                field: "connectivity.probe_interval".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "must be one of {}",
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

/// Expand a leading `~` or `~/` against the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = s.strip_prefix("~/") {
        return dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join(rest);
    }
    path.to_path_buf()
}
