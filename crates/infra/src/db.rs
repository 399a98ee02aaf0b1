//! Database connection wiring.

use sqlx::postgres::PgConnectOptions;

use crate::config::{ConfigError, DatabaseConfig};
use crate::record_store::PostgresRecordStore;

/// Translate configuration into Postgres connect options.
///
/// `DATABASE_URL` wins when present; otherwise the individual parts are used.
pub fn connect_options(cfg: &DatabaseConfig) -> Result<PgConnectOptions, ConfigError> {
    if let Some(url) = &cfg.url {
        return url
            .parse::<PgConnectOptions>()
            .map_err(|e| ConfigError::invalid("DATABASE_URL", e.to_string()));
    }

    Ok(PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .database(&cfg.name)
        .username(&cfg.user)
        .password(&cfg.password))
}

/// Lazily-connected record store for the configured table.
pub fn record_store(cfg: &DatabaseConfig) -> Result<PostgresRecordStore, ConfigError> {
    let options = connect_options(cfg)?;
    Ok(PostgresRecordStore::connect_lazy(options, cfg.table.clone()))
}
