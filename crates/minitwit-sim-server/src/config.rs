// ABOUTME: Configuration loading and validation for the simulator API server.
// ABOUTME: Reads environment variables; the binary may override fields from command-line flags.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

/// Path prefix under which the backend exposes its API.
pub const BACKEND_BASE_PATH: &str = "/devops";

/// Authorization header value the compliance harness sends.
pub const DEFAULT_AUTH_TOKEN: &str = "Basic c2ltdWxhdG9yOnN1cGVyX3NhZmUh";

pub const DEFAULT_BACKEND: &str = "localhost:8080";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 50;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SIM_PORT is not a valid port: {0}")]
    InvalidPort(String),

    #[error("SIM_BACKEND_TIMEOUT_SECS must be a positive number of seconds: {0}")]
    InvalidTimeout(String),

    #[error("backend address must not be empty")]
    EmptyBackend,

    #[error("auth token must not be empty; refusing to start with an open API")]
    EmptyAuthToken,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Backend `host:port`, or a full `http(s)://` origin.
    pub backend: String,
    pub port: u16,
    /// Complete expected `Authorization` header value, scheme included.
    pub auth_token: String,
    pub backend_timeout: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            port: DEFAULT_PORT,
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        }
    }
}

impl SimConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - SIM_BACKEND: backend address (default: localhost:8080)
    /// - SIM_PORT: port to listen on (default: 9000)
    /// - SIM_AUTH_TOKEN: expected Authorization header (default: the harness credential)
    /// - SIM_BACKEND_TIMEOUT_SECS: per-call backend timeout (default: 50)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(backend) = non_empty_var("SIM_BACKEND") {
            config.backend = backend;
        }

        if let Some(port) = non_empty_var("SIM_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }

        if let Some(token) = non_empty_var("SIM_AUTH_TOKEN") {
            config.auth_token = token;
        }

        if let Some(secs) = non_empty_var("SIM_BACKEND_TIMEOUT_SECS") {
            let parsed: u64 = secs
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(secs.clone()))?;
            if parsed == 0 {
                return Err(ConfigError::InvalidTimeout(secs));
            }
            config.backend_timeout = Duration::from_secs(parsed);
        }

        config.validate()?;
        Ok(config)
    }

    /// Re-check invariants after fields were overridden by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.trim().is_empty() {
            return Err(ConfigError::EmptyBackend);
        }
        if self.auth_token.is_empty() {
            return Err(ConfigError::EmptyAuthToken);
        }
        if self.backend_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        Ok(())
    }

    /// Full URL every backend path is appended to.
    pub fn backend_base_url(&self) -> String {
        let origin = self.backend.trim().trim_end_matches('/');
        if origin.starts_with("http://") || origin.starts_with("https://") {
            format!("{origin}{BACKEND_BASE_PATH}")
        } else {
            format!("http://{origin}{BACKEND_BASE_PATH}")
        }
    }

    /// Listen on all interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
