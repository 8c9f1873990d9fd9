use std::fmt;
use std::net::SocketAddr;

pub const HTTP_ADDR_VAR: &str = "SHIFT_CALENDAR_HTTP_ADDR";
pub const BASE_URL_VAR: &str = "SHIFT_CALENDAR_BASE_URL";
pub const LOG_VAR: &str = "SHIFT_CALENDAR_LOG";

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidAddr { value: String, message: String },
    InvalidVerbosity(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAddr { value, message } => {
                write!(f, "invalid {HTTP_ADDR_VAR} '{value}': {message}")
            }
            ConfigError::InvalidVerbosity(value) => {
                write!(f, "invalid {LOG_VAR} '{value}' (expected 0-3)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    /// Prefix for generated links, without the `/schedule` path.
    pub base_url: String,
    pub verbosity: u8,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup(HTTP_ADDR_VAR).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidAddr {
                value: addr.clone(),
                message: err.to_string(),
            })?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let verbosity = match lookup(LOG_VAR) {
            Some(value) => match value.trim().parse::<u8>() {
                Ok(level) if level <= 3 => level,
                _ => return Err(ConfigError::InvalidVerbosity(value)),
            },
            None => 0,
        };

        Ok(Self {
            http_addr,
            base_url,
            verbosity,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            base_url: DEFAULT_BASE_URL.to_string(),
            verbosity: 0,
        }
    }
}
