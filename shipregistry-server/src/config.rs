//! Environment configuration for the ship registry server.

use std::fmt;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Which ship store backs the registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// PostgreSQL through Diesel.
    Postgres,
    /// Process-local, lost on restart.
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreKind::Postgres),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(ConfigError::new(format!(
                "SHIPREGISTRY_STORE must be postgres or memory, got {other:?}"
            ))),
        }
    }
}

/// Error type for invalid configuration.
#[derive(Debug, Clone)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Backing store.
    pub store: StoreKind,
    /// PostgreSQL connection string, required for [`StoreKind::Postgres`].
    pub database_url: Option<String>,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Build configuration from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("SHIPREGISTRY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("SHIPREGISTRY_PORT") {
            Some(raw) => u16::from_str(raw.trim()).map_err(|_| {
                ConfigError::new(format!("SHIPREGISTRY_PORT must be a u16 number, got {raw:?}"))
            })?,
            None => DEFAULT_PORT,
        };
        let store = match lookup("SHIPREGISTRY_STORE") {
            Some(raw) => raw.parse()?,
            None => StoreKind::Postgres,
        };
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::new(
                "DATABASE_URL must be set to a PostgreSQL connection string",
            ));
        }
        let origins = lookup("SHIPREGISTRY_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let allowed_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
        Ok(Self {
            host,
            port,
            store,
            database_url,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, StoreKind};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_for_memory_store() {
        let config =
            ServerConfig::from_lookup(lookup(&[("SHIPREGISTRY_STORE", "memory")])).expect("config");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.database_url, None);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = ServerConfig::from_lookup(lookup(&[])).expect_err("missing url");
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/ships"),
            ("SHIPREGISTRY_PORT", "9000"),
            ("SHIPREGISTRY_UI_ORIGINS", " http://a.test, ,http://b.test "),
        ]))
        .expect("config");
        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.port, 9000);
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(
            ServerConfig::from_lookup(lookup(&[
                ("SHIPREGISTRY_STORE", "memory"),
                ("SHIPREGISTRY_PORT", "eighty")
            ]))
            .is_err()
        );
        assert!("sqlite".parse::<StoreKind>().is_err());
    }
}
