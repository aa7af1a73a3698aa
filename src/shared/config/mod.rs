//! Application configuration module
//!
//! Tunables for the offline outbox and its sync engine. Built through
//! `AppConfigBuilder`, which validates the result.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Automatic attempts per action before it is considered dead
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// How long synced actions are kept as an audit trail
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache age after which the booking list should be refetched
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote authority base URL
    pub server_url: Option<String>,
    /// Local store file; `None` selects the platform data directory
    pub database_path: Option<PathBuf>,
    pub max_retries: u32,
    pub retention: Duration,
    pub stale_after: Duration,
    pub request_timeout: Duration,
    /// Interval of the reachability probe
    pub probe_interval: Duration,
    /// Periodic background drain; `None` means the platform offers none
    pub background_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            database_path: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retention: DEFAULT_RETENTION,
            stale_after: DEFAULT_STALE_AFTER,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_interval: DEFAULT_PROBE_INTERVAL,
            background_interval: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.max_retries == 0 {
            return Err(ConfigError::OutOfRange("max_retries"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::OutOfRange("request_timeout"));
        }
        if self.probe_interval.is_zero() {
            return Err(ConfigError::OutOfRange("probe_interval"));
        }
        if matches!(self.background_interval, Some(interval) if interval.is_zero()) {
            return Err(ConfigError::OutOfRange("background_interval"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database_path = Some(path.into());
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn retention(mut self, retention: Duration) -> Self {
        self.config.retention = retention;
        self
    }

    pub fn stale_after(mut self, stale_after: Duration) -> Self {
        self.config.stale_after = stale_after;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn probe_interval(mut self, interval: Duration) -> Self {
        self.config.probe_interval = interval;
        self
    }

    pub fn background_interval(mut self, interval: Option<Duration>) -> Self {
        self.config.background_interval = interval;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("value out of range: {0}")]
    OutOfRange(&'static str),
}
