use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_seconds: u64,
    pub environment: Environment,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key}: '{value}' is not a valid number")]
    InvalidNumber { key: &'static str, value: String },
}

fn parse_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}

impl Config {
    /// Read the config from the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_number(&lookup, "PORT", "8000")?,
            jwt_secret: lookup("JWT_SECRET").unwrap_or_else(|| "sky-love".to_string()),
            jwt_expiry_seconds: parse_number(&lookup, "JWT_EXPIRY_SECONDS", "60000")?,
            environment: Environment::from_name(
                &lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
            ),
        })
    }

    /// Settings for tests: fixed secret, details visible in 500 bodies.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: jwt_secret.to_string(),
            jwt_expiry_seconds: 60000,
            environment: Environment::Test,
        }
    }

    /// Internal error details are only ever shown outside production.
    pub fn expose_internal_errors(&self) -> bool {
        self.environment != Environment::Production
    }
}
