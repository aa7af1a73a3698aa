use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::PathBuf;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Front-desk client configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
    token: Option<String>,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `FRONTDESK_API_URL`, `FRONTDESK_DB_PATH` and `FRONTDESK_API_TOKEN`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        if let Ok(url) = std::env::var("FRONTDESK_API_URL") {
            builder = builder.server_url(url);
        }
        if let Ok(path) = std::env::var("FRONTDESK_DB_PATH") {
            builder = builder.database_path(path);
        }

        let mut config = Self::with_builder(builder)?;
        config.set_token(std::env::var("FRONTDESK_API_TOKEN").ok().filter(|t| !t.is_empty()));
        Ok(config)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app, token: None })
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Set the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the bearer token
    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Local store location
    ///
    /// Falls back to the platform data directory, or the temp directory when
    /// the platform has none.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.app.database_path {
            return path.clone();
        }

        let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        path.push("frontdesk-sync");
        path.push("local.db");
        path
    }
}
