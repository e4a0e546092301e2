//! Configuration for Missingcast
//!
//! Everything comes from the process environment. Database settings fall back
//! to local development defaults; the four X credentials are required.

use secrecy::{ExposeSecret, SecretString};
use sqlx::mysql::MySqlConnectOptions;

use crate::error::{ConfigError, Result};

pub const API_KEY_VAR: &str = "API_KEY";
pub const API_KEY_SECRET_VAR: &str = "API_KEY_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
pub const ACCESS_SECRET_VAR: &str = "ACCESS_SECRET";

pub const DB_HOST_VAR: &str = "DB_HOST";
pub const DB_PORT_VAR: &str = "DB_PORT";
pub const DB_USER_VAR: &str = "DB_USER";
pub const DB_PASSWORD_VAR: &str = "DB_PASSWORD";
pub const DB_NAME_VAR: &str = "DB_NAME";

#[derive(Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub x: XCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

/// OAuth 1.0a user-context credentials for the X API
#[derive(Debug)]
pub struct XCredentials {
    pub api_key: SecretString,
    pub api_key_secret: SecretString,
    pub access_token: SecretString,
    pub access_secret: SecretString,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "admin".to_string(),
            password: "12345678".to_string(),
            name: "missing_persons_db".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Read the `DB_*` variables through `lookup`, keeping defaults for unset ones
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup(DB_PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: DB_PORT_VAR.to_string(),
                value: raw.clone(),
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup(DB_HOST_VAR).unwrap_or(defaults.host),
            port,
            user: lookup(DB_USER_VAR).unwrap_or(defaults.user),
            password: lookup(DB_PASSWORD_VAR).unwrap_or(defaults.password),
            name: lookup(DB_NAME_VAR).unwrap_or(defaults.name),
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .charset("utf8mb4")
    }
}

impl XCredentials {
    pub fn new(
        api_key: impl Into<String>,
        api_key_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            api_key_secret: SecretString::from(api_key_secret.into()),
            access_token: SecretString::from(access_token.into()),
            access_secret: SecretString::from(access_secret.into()),
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(name.to_string()).into())
        };

        Ok(Self::new(
            required(API_KEY_VAR)?,
            required(API_KEY_SECRET_VAR)?,
            required(ACCESS_TOKEN_VAR)?,
            required(ACCESS_SECRET_VAR)?,
        ))
    }

    pub(crate) fn consumer_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        self.api_key_secret.expose_secret()
    }

    pub(crate) fn token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub(crate) fn token_secret(&self) -> &str {
        self.access_secret.expose_secret()
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database: DatabaseConfig::from_lookup(&lookup)?,
            x: XCredentials::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MissingcastError;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn x_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (API_KEY_VAR, "key"),
            (API_KEY_SECRET_VAR, "key-secret"),
            (ACCESS_TOKEN_VAR, "token"),
            (ACCESS_SECRET_VAR, "token-secret"),
        ]
    }

    #[test]
    fn test_database_defaults() {
        let db = DatabaseConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(db, DatabaseConfig::default());
        assert_eq!(db.host, "localhost");
        assert_eq!(db.port, 3306);
        assert_eq!(db.user, "admin");
        assert_eq!(db.name, "missing_persons_db");
    }

    #[test]
    fn test_database_overrides() {
        let db = DatabaseConfig::from_lookup(lookup_from(&[
            (DB_HOST_VAR, "db.internal"),
            (DB_PORT_VAR, "3307"),
            (DB_USER_VAR, "reader"),
            (DB_PASSWORD_VAR, "hunter2"),
            (DB_NAME_VAR, "people"),
        ]))
        .unwrap();

        assert_eq!(db.host, "db.internal");
        assert_eq!(db.port, 3307);
        assert_eq!(db.user, "reader");
        assert_eq!(db.password, "hunter2");
        assert_eq!(db.name, "people");
    }

    #[test]
    fn test_invalid_port() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[(DB_PORT_VAR, "mysql")])).unwrap_err();
        match err {
            MissingcastError::Config(ConfigError::InvalidValue { name, value }) => {
                assert_eq!(name, DB_PORT_VAR);
                assert_eq!(value, "mysql");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_loaded() {
        let creds = XCredentials::from_lookup(lookup_from(&x_vars())).unwrap();
        assert_eq!(creds.consumer_key(), "key");
        assert_eq!(creds.consumer_secret(), "key-secret");
        assert_eq!(creds.token(), "token");
        assert_eq!(creds.token_secret(), "token-secret");
    }

    #[test]
    fn test_missing_credential() {
        let vars: Vec<_> = x_vars()
            .into_iter()
            .filter(|(k, _)| *k != ACCESS_SECRET_VAR)
            .collect();
        let err = XCredentials::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: ACCESS_SECRET"
        );
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let mut vars = x_vars();
        vars[0] = (API_KEY_VAR, "   ");
        let err = XCredentials::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = XCredentials::new("visible-key", "s3cret", "tok", "tok-s3cret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("visible-key"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        for (k, v) in x_vars() {
            std::env::set_var(k, v);
        }
        std::env::set_var(DB_NAME_VAR, "env_db");

        let config = Config::from_env().unwrap();
        assert_eq!(config.database.name, "env_db");
        assert_eq!(config.x.token(), "token");

        for (k, _) in x_vars() {
            std::env::remove_var(k);
        }
        std::env::remove_var(DB_NAME_VAR);
    }
}
