//! Configuration management for the media listing service.
//!
//! Database parameters arrive as discrete `POSTGRES_*` environment
//! variables rather than a single URL, matching how this service has always
//! been deployed. No transport encryption requirement is imposed.

use std::{net::SocketAddr, str::FromStr};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

const CONFIG_FILE: &str = "media.toml";

/// Database connection parameters loaded from `POSTGRES_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database user. Environment variable: `POSTGRES_USER`
    #[serde(default = "default_db_user")]
    pub user: String,
    /// Database password. Environment variable: `POSTGRES_PASSWORD`
    #[serde(default)]
    pub password: String,
    /// Database host. Environment variable: `POSTGRES_HOST`
    #[serde(default = "default_db_host")]
    pub host: String,
    /// Database port. Environment variable: `POSTGRES_PORT`
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database name. Environment variable: `POSTGRES_DATABASE`
    #[serde(default = "default_db_name")]
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: default_db_user(),
            password: String::new(),
            host: default_db_host(),
            port: default_db_port(),
            database: default_db_name(),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection parameters.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Server bind address. Environment variable: `MEDIA_HOST`
    #[serde(default = "default_host")]
    pub host: String,
    /// Server bind port. Environment variable: `MEDIA_PORT`
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    ///
    /// `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_HOST`,
    /// `POSTGRES_PORT`, and `POSTGRES_DATABASE` populate the database
    /// section; `MEDIA_HOST` and `MEDIA_PORT` control the bind address.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("POSTGRES_").map(|key| format!("database.{}", key.as_str()).into()))
            .merge(Env::prefixed("MEDIA_"));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Builds connection options from the discrete parameters.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.database.host)
            .port(self.database.port)
            .username(&self.database.user)
            .database(&self.database.database);

        if !self.database.password.is_empty() {
            options = options.password(&self.database.password);
        }

        options
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.database.port == 0 {
            anyhow::bail!("database port must be greater than 0");
        }

        Ok(())
    }
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "postgres".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, env, sync::Mutex};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct TestEnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
        vars: Vec<String>,
        originals: HashMap<String, Option<String>>,
    }

    impl TestEnvGuard {
        fn new() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Self { _lock: lock, vars: Vec::new(), originals: HashMap::new() }
        }

        fn set_var(&mut self, key: &str, value: &str) {
            if !self.vars.contains(&key.to_string()) {
                self.originals.insert(key.to_string(), env::var(key).ok());
                self.vars.push(key.to_string());
            }
            env::set_var(key, value);
        }
    }

    impl Drop for TestEnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                match self.originals.get(var) {
                    Some(Some(value)) => env::set_var(var, value),
                    Some(None) => env::remove_var(var),
                    None => {},
                }
            }
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn postgres_env_vars_populate_database_section() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("POSTGRES_USER", "media_reader");
        guard.set_var("POSTGRES_PASSWORD", "s3cret");
        guard.set_var("POSTGRES_HOST", "db.internal");
        guard.set_var("POSTGRES_PORT", "6432");
        guard.set_var("POSTGRES_DATABASE", "media_db");

        let config = Config::load().expect("Config should load with env overrides");

        assert_eq!(config.database.user, "media_reader");
        assert_eq!(config.database.password, "s3cret");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6432);
        assert_eq!(config.database.database, "media_db");
    }

    #[test]
    fn invalid_config_validation_fails() {
        let mut config = Config::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.database.port = 0;
        assert!(config.validate().is_err());
    }
}
