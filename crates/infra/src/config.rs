//! Configuration loading and representation.
//!
//! Everything comes from environment variables. Missing credentials are not
//! fatal: they are logged and left empty so the failure shows up when the
//! database or identity provider is first used. Values that are present but
//! malformed are rejected at startup.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;
use uuid::Uuid;

use tablegate_auth::{DEFAULT_AUTHORITY_HOST, EntraSettings};

use crate::record_store::TableName;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_PORT: u16 = 5432;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub table: TableName,
}

impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// External scheme + host, without trailing slash. `None` derives it per request.
    pub public_base_url: Option<String>,
    pub secret_key: String,
    pub session_cookie_secure: bool,
    pub database: DatabaseConfig,
    pub entra: EntraSettings,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("public_base_url", &self.public_base_url)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .field("database", &self.database)
            .field("entra", &self.entra)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                tracing::warn!(key, "required setting is not set; dependent requests will fail");
                String::new()
            })
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", e.to_string()))?;

        let public_base_url = get("PUBLIC_BASE_URL")
            .map(|raw| parse_base_url(&raw))
            .transpose()?;

        let secret_key = get("APP_SECRET_KEY").unwrap_or_else(|| {
            tracing::warn!("APP_SECRET_KEY not set; sessions will not survive a restart");
            format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
        });

        let session_cookie_secure = match get("SESSION_COOKIE_SECURE") {
            Some(raw) => parse_bool("SESSION_COOKIE_SECURE", &raw)?,
            None => false,
        };

        let port = match get("DATABASE_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("DATABASE_PORT", e.to_string()))?,
            None => DEFAULT_DB_PORT,
        };

        let table = match get("RECORD_TABLE") {
            Some(raw) => raw
                .parse::<TableName>()
                .map_err(|reason| ConfigError::invalid("RECORD_TABLE", reason))?,
            None => TableName::default(),
        };

        let url = get("DATABASE_URL");
        let database = if url.is_some() {
            DatabaseConfig {
                url,
                host: String::new(),
                port,
                name: String::new(),
                user: String::new(),
                password: String::new(),
                table,
            }
        } else {
            DatabaseConfig {
                url: None,
                host: get("DATABASE_HOST").unwrap_or_else(|| "localhost".to_string()),
                port,
                name: required("DATABASE_NAME"),
                user: required("DATABASE_USER"),
                password: required("DATABASE_PASSWORD"),
                table,
            }
        };

        let entra = EntraSettings {
            client_id: required("ENTRA_CLIENT_ID"),
            client_secret: required("ENTRA_CLIENT_SECRET"),
            tenant_id: required("ENTRA_TENANT_ID"),
            authority_host: get("ENTRA_AUTHORITY_HOST")
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
        };

        Ok(Self {
            bind_addr,
            public_base_url,
            secret_key,
            session_cookie_secure,
            database,
            entra,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid("PUBLIC_BASE_URL", e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::invalid(
            "PUBLIC_BASE_URL",
            "expected an absolute http(s) URL",
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, format!("'{raw}' is not a boolean"))),
    }
}
