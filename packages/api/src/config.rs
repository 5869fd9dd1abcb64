use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use shared::services::credential_store::DEFAULT_COST;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_QUERY_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} environment variable must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_query_timeout: Duration,
    pub bcrypt_cost: u32,
}

impl Settings {
    /// Reads settings from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Settings {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_addr: parse_or(&lookup, "SERVER_ADDR", || {
                SocketAddr::from(([0, 0, 0, 0], 8080))
            })?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", || {
                DEFAULT_DB_MAX_CONNECTIONS
            })?,
            db_query_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_QUERY_TIMEOUT_SECS",
                || DEFAULT_DB_QUERY_TIMEOUT_SECS,
            )?),
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", || DEFAULT_COST)?,
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    D: FnOnce() -> T,
{
    match lookup(key) {
        None => Ok(default()),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[("DATABASE_URL", "postgres://localhost/golf"), ("JWT_SECRET", "s")])
            .unwrap();

        assert_eq!(settings.server_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.db_query_timeout, Duration::from_secs(3));
        assert_eq!(settings.bcrypt_cost, DEFAULT_COST);
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("DATABASE_URL", "postgres://localhost/golf"),
            ("JWT_SECRET", "s"),
            ("SERVER_ADDR", "127.0.0.1:3000"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("DB_QUERY_TIMEOUT_SECS", "10"),
            ("BCRYPT_COST", "6"),
        ])
        .unwrap();

        assert_eq!(settings.server_addr.port(), 3000);
        assert_eq!(settings.db_max_connections, 12);
        assert_eq!(settings.db_query_timeout, Duration::from_secs(10));
        assert_eq!(settings.bcrypt_cost, 6);
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(
            settings(&[("JWT_SECRET", "s")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        assert_eq!(
            settings(&[("DATABASE_URL", "postgres://localhost/golf"), ("JWT_SECRET", "")])
                .unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn test_unparsable_value() {
        let err = settings(&[
            ("DATABASE_URL", "postgres://localhost/golf"),
            ("JWT_SECRET", "s"),
            ("DB_MAX_CONNECTIONS", "lots"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "lots".to_string()
            }
        );
    }
}
