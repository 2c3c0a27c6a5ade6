//! Centralized configuration (environment variables + defaults).
//!
//! `.env` is honoured via `dotenv`. Values are read once into an [`AppConfig`]
//! which the binaries hand to the pieces that need them.

use crate::app::EmptyListPolicy;
use crate::transport::http::DeleteResponse;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which contact store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in_memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown store '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Create the `contacts` table at startup when missing.
    pub synchronize: bool,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url).map_err(|e| ConfigError::Invalid {
                key: "DATABASE_URL",
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            }),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.username)
                .password(&self.password)
                .database(&self.database)),
        }
    }

    /// Where the service connects, without credentials. Safe to log.
    pub fn display_target(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.database),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub origin: String,
    pub methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub credentials: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    /// Hides internal error details from responses.
    pub production: bool,
    pub store: StoreKind,
    pub empty_list: EmptyListPolicy,
    pub delete_response: DeleteResponse,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            host: get("DB_HOST", "localhost"),
            port: parse("DB_PORT", &get("DB_PORT", "5432"))?,
            username: get("DB_USERNAME", "postgres"),
            password: get("DB_PASSWORD", "postgres"),
            database: get("DB_DATABASE", "contact_management"),
            synchronize: parse_bool("DB_SYNC", &get("DB_SYNC", "true"))?,
            max_connections: parse::<u32>("DB_MAX_CONNECTIONS", &get("DB_MAX_CONNECTIONS", "5"))?
                .max(1),
        };

        let cors = CorsConfig {
            origin: get("FRONTEND_URL", "http://localhost:3000"),
            methods: split_list(&get("CORS_METHODS", "GET,POST,PUT,DELETE,PATCH,OPTIONS")),
            allowed_headers: split_list(&get(
                "CORS_ALLOWED_HEADERS",
                "Content-Type,Authorization,Accept",
            )),
            credentials: parse_bool("CORS_CREDENTIALS", &get("CORS_CREDENTIALS", "true"))?,
        };

        let environment = lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_default();

        Ok(Self {
            port: parse("PORT", &get("PORT", "3000"))?,
            database,
            cors,
            production: environment.trim().eq_ignore_ascii_case("production"),
            store: parse("CONTACTS_STORE", &get("CONTACTS_STORE", "postgres"))?,
            empty_list: parse("CONTACTS_EMPTY_LIST", &get("CONTACTS_EMPTY_LIST", "not_found"))?,
            delete_response: parse(
                "CONTACTS_DELETE_RESPONSE",
                &get("CONTACTS_DELETE_RESPONSE", "snapshot"),
            )?,
        })
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.database.host, "localhost");
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.database.database, "contact_management");
        assert!(cfg.database.synchronize);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.cors.origin, "http://localhost:3000");
        assert_eq!(cfg.cors.methods.len(), 6);
        assert_eq!(
            cfg.cors.allowed_headers,
            vec!["Content-Type", "Authorization", "Accept"]
        );
        assert!(cfg.cors.credentials);
        assert!(!cfg.production);
        assert_eq!(cfg.store, StoreKind::Postgres);
        assert_eq!(cfg.empty_list, EmptyListPolicy::NotFound);
        assert_eq!(cfg.delete_response, DeleteResponse::Snapshot);
        assert_eq!(cfg.database.display_target(), "localhost:5432/contact_management");
    }

    #[test]
    fn overrides() {
        let cfg = config_from(&[
            ("PORT", "8080"),
            ("DB_SYNC", "false"),
            ("NODE_ENV", "production"),
            ("CONTACTS_STORE", "memory"),
            ("CONTACTS_EMPTY_LIST", "empty"),
            ("CONTACTS_DELETE_RESPONSE", "no_content"),
            ("CORS_METHODS", "GET, POST"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(!cfg.database.synchronize);
        assert!(cfg.production);
        assert_eq!(cfg.store, StoreKind::Memory);
        assert_eq!(cfg.empty_list, EmptyListPolicy::EmptyOk);
        assert_eq!(cfg.delete_response, DeleteResponse::NoContent);
        assert_eq!(cfg.cors.methods, vec!["GET", "POST"]);
    }

    #[test]
    fn app_env_wins_over_node_env() {
        let cfg = config_from(&[("APP_ENV", "development"), ("NODE_ENV", "production")]).unwrap();
        assert!(!cfg.production);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().starts_with("PORT has an invalid value 'eighty'"));
        assert!(config_from(&[("DB_SYNC", "maybe")]).is_err());
        assert!(config_from(&[("CONTACTS_STORE", "redis")]).is_err());
    }

    #[test]
    fn database_url_takes_precedence() {
        let cfg = config_from(&[("DATABASE_URL", "postgres://u:p@db:6543/contacts")]).unwrap();
        assert_eq!(cfg.database.display_target(), "DATABASE_URL");
        assert!(cfg.database.connect_options().is_ok());
    }
}
