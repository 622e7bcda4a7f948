use std::env;
use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::{create_cors_layer, split_origins, DEFAULT_ALLOWED_ORIGINS};
pub use security::create_security_headers_layer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_COOKIE_NAME: &str = "wellness_session";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_REMEMBER_DAYS: i64 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage REST API, e.g. `https://x.supabase.co/storage/v1`.
    pub url: String,
    pub service_key: String,
    /// Base used when building public object URLs.
    pub public_url: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl: Duration,
    pub remember_ttl: Duration,
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            remember_ttl: Duration::days(DEFAULT_REMEMBER_DAYS),
            secure_cookie: false,
        }
    }
}

/// Settings for the HTTP layers wrapped around the router.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub allowed_origins: Vec<String>,
    /// Enables HSTS.
    pub is_production: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            is_production: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Reads the process environment once at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let database_url = require("DATABASE_URL")?;
        let storage_url = require("STORAGE_URL")?.trim_end_matches('/').to_string();
        let service_key = require("STORAGE_SERVICE_KEY")?;
        let public_url = get("PUBLIC_STORAGE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| storage_url.clone());

        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), || {
            DEFAULT_BIND_ADDR.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: DEFAULT_BIND_ADDR.to_string(),
            })
        })?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), || {
            Ok(DEFAULT_MAX_CONNECTIONS)
        })?;
        let ttl_hours: i64 = parse_or("SESSION_TTL_HOURS", get("SESSION_TTL_HOURS"), || {
            Ok(DEFAULT_SESSION_TTL_HOURS)
        })?;
        let remember_days: i64 = parse_or("SESSION_REMEMBER_DAYS", get("SESSION_REMEMBER_DAYS"), || {
            Ok(DEFAULT_REMEMBER_DAYS)
        })?;

        let is_production = get("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            storage: StorageConfig {
                url: storage_url,
                service_key,
                public_url,
            },
            session: SessionConfig {
                cookie_name: get("SESSION_COOKIE_NAME")
                    .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
                ttl: Duration::hours(ttl_hours),
                remember_ttl: Duration::days(remember_days),
                secure_cookie: is_production,
            },
            http: HttpConfig {
                allowed_origins: split_origins(
                    &get("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
                ),
                is_production,
            },
        })
    }
}

fn parse_or<T, D>(name: &'static str, raw: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    D: FnOnce() -> Result<T, ConfigError>,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/wellness"),
        ("STORAGE_URL", "https://storage.example.com/storage/v1/"),
        ("STORAGE_SERVICE_KEY", "service-key"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.bind_addr.port(), 3001);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.storage.url, "https://storage.example.com/storage/v1");
        assert_eq!(config.storage.public_url, config.storage.url);
        assert_eq!(config.session.cookie_name, "wellness_session");
        assert_eq!(config.session.ttl, Duration::hours(24));
        assert_eq!(config.session.remember_ttl, Duration::days(7));
        assert!(!config.session.secure_cookie);
        assert!(!config.http.is_production);
        assert_eq!(config.http.allowed_origins, ["http://localhost:3000"]);
    }

    #[test]
    fn test_missing_required_fails_fast() {
        for (missing, _) in REQUIRED {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(missing));
            assert_eq!(err.to_string(), format!("{missing} must be set"));
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[2] = ("STORAGE_SERVICE_KEY", "  ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("STORAGE_SERVICE_KEY"));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SESSION_TTL_HOURS", "soon"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SESSION_TTL_HOURS", .. }));
    }

    #[test]
    fn test_production_enables_secure_cookie() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RUST_ENV", "Production"));
        pairs.push(("PUBLIC_STORAGE_URL", "https://cdn.example.com/"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.session.secure_cookie);
        assert!(config.http.is_production);
        assert_eq!(config.storage.public_url, "https://cdn.example.com");
    }

    #[test]
    fn test_cors_origins_read_once() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("CORS_ALLOWED_ORIGINS", "https://admin.example.com, https://ops.example.com"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.http.allowed_origins,
            ["https://admin.example.com", "https://ops.example.com"]
        );
    }
}
