//! `tablegate-core`: the record model shared by storage and HTTP layers.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod record;

pub use error::DomainError;
pub use id::RecordId;
pub use record::{MAX_FIELD_CHARS, Record, RecordUpdate};
