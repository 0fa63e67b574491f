use std::env;
use std::str::FromStr;

use nplus1_orm::DatabasePoolConfig;
use thiserror::Error;
use url::Url;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

/// Environment enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue {
                field: "environment".to_string(),
                value: s.to_string(),
                expected: "development, testing, or production".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env_str = match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        };
        write!(f, "{}", env_str)
    }
}

pub const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Database connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn pool_config(&self) -> DatabasePoolConfig {
        DatabasePoolConfig {
            max_connections: self.max_connections,
            acquire_timeout_seconds: self.acquire_timeout_secs,
            ..DatabasePoolConfig::default()
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseSettings,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("NPLUS1_ENV") {
            Some(value) => value.parse()?,
            None => Environment::Development,
        };

        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        let config = Self {
            environment,
            database: DatabaseSettings {
                url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5, "positive integer")?,
                acquire_timeout_secs: parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 30, "number of seconds")?,
            },
            log_level: lookup("LOG_LEVEL").map(|level| level.to_lowercase()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database.url.starts_with("postgres://") && !self.database.url.starts_with("postgresql://") {
            return Err(ConfigError::InvalidValue {
                field: "database_url".to_string(),
                value: mask_database_url(&self.database.url),
                expected: "postgres:// or postgresql:// URL".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "db_max_connections".to_string(),
                value: "0".to_string(),
                expected: "at least 1".to_string(),
            });
        }

        if let Some(level) = &self.log_level {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "log_level".to_string(),
                    value: level.clone(),
                    expected: format!("one of: {}", VALID_LOG_LEVELS.join(", ")),
                });
            }
        }

        Ok(())
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingRequired {
            field: key.to_lowercase(),
            hint: format!("{} environment variable is required when DATABASE_URL is not set", key),
        })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T, expected: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            field: key.to_lowercase(),
            value,
            expected: expected.to_string(),
        }),
        None => Ok(default),
    }
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST")
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    let port: u16 = parse_or(lookup, "DB_PORT", 5432, "valid port number (0-65535)")?;
    let name = lookup("DB_NAME")
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "nplus1_demo".to_string());
    let username = required(lookup, "DB_USERNAME")?;
    let password = required(lookup, "DB_PASSWORD")?;

    let invalid = |value: String| ConfigError::InvalidValue {
        field: "db_host".to_string(),
        value,
        expected: "host name usable in a postgres:// URL".to_string(),
    };

    let mut url = Url::parse(&format!("postgres://{}:{}/{}", host, port, name)).map_err(|_| invalid(host.clone()))?;
    url.set_username(&username).map_err(|_| invalid(host.clone()))?;
    url.set_password(Some(&password)).map_err(|_| invalid(host.clone()))?;

    Ok(url.to_string())
}

/// Hide the password of a database URL before it is logged
pub fn mask_database_url(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some("****")).is_err() {
                return "<unprintable database url>".to_string();
            }
            url.to_string()
        }
        Err(_) => url_str.to_string(),
    }
}
