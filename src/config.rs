//! Runtime configuration loaded from environment variables.
//!
//! - `REFLECTION_API_BASE_URL` - backend base address (default `http://localhost:8000`)
//! - `REFLECTION_POLL_INTERVAL_MS` - delay between status polls (default 2000)
//! - `MOCK_BACKEND_ADDR` - bind address for the mock backend (default `127.0.0.1:8000`)
//! - `MOCK_BACKEND_PROCESSING_DELAY_MS` - queued -> processing delay (default 1000)
//! - `MOCK_BACKEND_COMPLETION_DELAY_MS` - queued -> completed delay (default 5000)
//! - `MOCK_BACKEND_TASK_TTL_MS` - how long the mock keeps a task (default one hour)

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base address, without trailing slash.
    pub api_base_url: String,
    /// Fixed delay between two status polls.
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = match std::env::var("REFLECTION_API_BASE_URL") {
            Ok(value) if !value.trim().is_empty() => normalize_base_url(&value)?,
            _ => DEFAULT_API_BASE_URL.to_string(),
        };

        let poll_interval = match std::env::var("REFLECTION_POLL_INTERVAL_MS") {
            Ok(value) => parse_millis("REFLECTION_POLL_INTERVAL_MS", &value)?,
            Err(_) => DEFAULT_POLL_INTERVAL,
        };

        Ok(Self {
            api_base_url,
            poll_interval,
        })
    }
}

/// Mock backend configuration.
#[derive(Debug, Clone)]
pub struct MockBackendConfig {
    pub bind_addr: SocketAddr,
    /// Elapsed time after which a queued task reports `processing`.
    pub processing_delay: Duration,
    /// Elapsed time after which a task reports its terminal status.
    pub completion_delay: Duration,
    /// Elapsed time after which a task is forgotten.
    pub task_ttl: Duration,
}

impl Default for MockBackendConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            processing_delay: Duration::from_millis(1000),
            completion_delay: Duration::from_millis(5000),
            task_ttl: Duration::from_secs(3600),
        }
    }
}

impl MockBackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("MOCK_BACKEND_ADDR") {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    name: "MOCK_BACKEND_ADDR",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Ok(value) = std::env::var("MOCK_BACKEND_PROCESSING_DELAY_MS") {
            config.processing_delay = parse_millis("MOCK_BACKEND_PROCESSING_DELAY_MS", &value)?;
        }
        if let Ok(value) = std::env::var("MOCK_BACKEND_COMPLETION_DELAY_MS") {
            config.completion_delay = parse_millis("MOCK_BACKEND_COMPLETION_DELAY_MS", &value)?;
        }
        if let Ok(value) = std::env::var("MOCK_BACKEND_TASK_TTL_MS") {
            config.task_ttl = parse_millis("MOCK_BACKEND_TASK_TTL_MS", &value)?;
        }

        Ok(config)
    }
}

/// Validate a base address and strip trailing slashes.
pub fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        value: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_millis(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        })?;

    if millis == 0 {
        return Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(Duration::from_millis(millis))
}
