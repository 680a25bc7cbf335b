//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP port
    pub port: u16,

    /// Address the listener binds to
    pub bind_addr: String,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Deadline for one checkout unit of work
    pub checkout_timeout: Duration,

    /// Allowed CORS origins, `*` for any
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            port: var("KASIR_PORT", "8090")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KASIR_PORT".to_string()))?,

            bind_addr: var("KASIR_BIND_ADDR", "0.0.0.0"),

            db_path: PathBuf::from(var("KASIR_DB_PATH", "./kasir.db")),

            db_max_connections: var("KASIR_DB_MAX_CONNECTIONS", "5")
                .parse()
                .ok()
                .filter(|n: &u32| *n >= 1)
                .ok_or_else(|| ConfigError::InvalidValue("KASIR_DB_MAX_CONNECTIONS".to_string()))?,

            checkout_timeout: var("KASIR_CHECKOUT_TIMEOUT_SECS", "10")
                .parse()
                .ok()
                .filter(|secs: &u64| *secs >= 1)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConfigError::InvalidValue("KASIR_CHECKOUT_TIMEOUT_SECS".to_string())
                })?,

            cors_origins: var("KASIR_CORS_ORIGINS", "*")
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
        };

        if config.cors_origins.is_empty() {
            return Err(ConfigError::InvalidValue("KASIR_CORS_ORIGINS".to_string()));
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("KASIR_BIND_ADDR".to_string()))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
