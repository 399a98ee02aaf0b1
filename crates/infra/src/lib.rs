//! Infrastructure layer: record storage, database wiring, configuration.

pub mod config;
pub mod db;
pub mod record_store;

pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use record_store::{InMemoryRecordStore, PostgresRecordStore, RecordStore, StoreError, TableName};
