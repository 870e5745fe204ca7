//! Runtime configuration read from the environment at startup.
//!
//! # Invariants
//! - Configuration is read once; nothing re-reads the environment later.
//! - Malformed values are rejected, not silently replaced by defaults.

use shoplist_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_ADDR: &str = "SHOPLIST_ADDR";
pub const ENV_DB_PATH: &str = "SHOPLIST_DB_PATH";
pub const ENV_WORKERS: &str = "SHOPLIST_WORKERS";
pub const ENV_LOG_LEVEL: &str = "SHOPLIST_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SHOPLIST_LOG_DIR";

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "./einkaufsliste.db";
const DEFAULT_WORKERS: usize = 4;
const MAX_WORKERS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub workers: usize,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid {key}=`{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let addr_text = read(ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_text
            .parse::<SocketAddr>()
            .map_err(|err| invalid(ENV_ADDR, &addr_text, err.to_string()))?;

        let db_path = PathBuf::from(read(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string()));

        let workers = match read(ENV_WORKERS) {
            Some(text) => parse_workers(&text)?,
            None => DEFAULT_WORKERS,
        };

        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            addr,
            db_path,
            workers,
            log_level,
            log_dir: read(ENV_LOG_DIR),
        })
    }
}

fn parse_workers(text: &str) -> Result<usize, ConfigError> {
    let workers = text
        .parse::<usize>()
        .map_err(|err| invalid(ENV_WORKERS, text, err.to_string()))?;
    if workers == 0 || workers > MAX_WORKERS {
        return Err(invalid(
            ENV_WORKERS,
            text,
            format!("expected 1..={MAX_WORKERS}"),
        ));
    }
    Ok(workers)
}

fn invalid(key: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig, ENV_ADDR, ENV_LOG_DIR, ENV_WORKERS};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.workers, 4);
        assert!(config.db_path.ends_with("einkaufsliste.db"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(ENV_LOG_DIR, "   "), (ENV_WORKERS, "")]).unwrap();
        assert_eq!(config.log_dir, None);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(config_from(&[(ENV_ADDR, "localhost")]).is_err());
        assert!(config_from(&[(ENV_WORKERS, "0")]).is_err());
        assert!(config_from(&[(ENV_WORKERS, "many")]).is_err());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[(ENV_ADDR, "127.0.0.1:9000"), (ENV_WORKERS, "8")]).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.workers, 8);
    }
}
