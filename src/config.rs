use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Connection settings for the candidate table's backing store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            name: "candidate_management".to_string(),
            max_connections: 20,
            idle_timeout: Duration::from_millis(30_000),
            connect_timeout: Duration::from_millis(2_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage_backend: StorageBackend,
    pub database: DatabaseConfig,
    pub static_dir: Option<String>,
    pub cors_allowed_origin: Option<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3000".to_string(),
            storage_backend: StorageBackend::Postgres,
            database: DatabaseConfig::default(),
            static_dir: None,
            cors_allowed_origin: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let db_defaults = DatabaseConfig::default();

        let database = DatabaseConfig {
            url: non_empty(lookup("DATABASE_URL")),
            host: non_empty(lookup("DB_HOST")).unwrap_or(db_defaults.host),
            port: parse_or(&lookup, "DB_PORT", db_defaults.port)?,
            user: non_empty(lookup("DB_USER")).unwrap_or(db_defaults.user),
            password: non_empty(lookup("DB_PASSWORD")),
            name: non_empty(lookup("DB_NAME")).unwrap_or(db_defaults.name),
            max_connections: parse_or(&lookup, "DB_POOL_MAX", db_defaults.max_connections)?,
            idle_timeout: Duration::from_millis(parse_or(
                &lookup,
                "DB_IDLE_TIMEOUT_MS",
                db_defaults.idle_timeout.as_millis() as u64,
            )?),
            connect_timeout: Duration::from_millis(parse_or(
                &lookup,
                "DB_CONNECT_TIMEOUT_MS",
                db_defaults.connect_timeout.as_millis() as u64,
            )?),
        };

        if database.max_connections == 0 {
            return Err(Error::Config(
                "Invalid value for DB_POOL_MAX: must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            server_address: non_empty(lookup("SERVER_ADDRESS")).unwrap_or(defaults.server_address),
            storage_backend: parse_or(&lookup, "STORAGE_BACKEND", defaults.storage_backend)?,
            database,
            static_dir: non_empty(lookup("STATIC_DIR")),
            cors_allowed_origin: non_empty(lookup("CORS_ALLOWED_ORIGIN")),
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup(name)) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_address, "0.0.0.0:3000");
        assert_eq!(config.storage_backend, StorageBackend::Postgres);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "candidate_management");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.idle_timeout, Duration::from_secs(30));
        assert_eq!(config.database.connect_timeout, Duration::from_secs(2));
        assert!(config.database.url.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_database_parts_and_backend() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_PASSWORD", "secret"),
            ("DB_POOL_MAX", "5"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.password.as_deref(), Some("secret"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = Config::from_lookup(lookup_from(&[("DB_PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("DB_PORT"));

        let err = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "sqlite")])).unwrap_err();
        assert!(err.to_string().contains("STORAGE_BACKEND"));

        let err = Config::from_lookup(lookup_from(&[("DB_POOL_MAX", "0")])).unwrap_err();
        assert!(err.to_string().contains("DB_POOL_MAX"));
    }
}
