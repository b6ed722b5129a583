//! Configuration for the API server binary.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults, so a bare `gameplan-api` starts a working local instance.

/// Complete server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Data root for the file-backed store.
    pub data_dir: String,
    /// The host address to bind to.
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `GAMEPLAN_DATA_DIR` -- data root (default `game_plan_data`)
    /// - `GAMEPLAN_HOST` -- bind address (default `0.0.0.0`)
    /// - `GAMEPLAN_PORT` -- TCP port (default `8080`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `GAMEPLAN_PORT` is not a valid
    /// port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir =
            std::env::var("GAMEPLAN_DATA_DIR").unwrap_or_else(|_| String::from("game_plan_data"));
        let host = std::env::var("GAMEPLAN_HOST").unwrap_or_else(|_| String::from("0.0.0.0"));
        let port: u16 = std::env::var("GAMEPLAN_PORT")
            .unwrap_or_else(|_| String::from("8080"))
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid GAMEPLAN_PORT: {e}")))?;

        Ok(Self {
            data_dir,
            host,
            port,
        })
    }
}
