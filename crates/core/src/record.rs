//! The editable row: an integer key and two bounded string columns.

use serde::{Deserialize, Serialize};

use crate::id::RecordId;

/// Column capacity of `col1`/`col2`, in characters.
pub const MAX_FIELD_CHARS: usize = 100;

/// One row of the record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub col1: String,
    pub col2: String,
}

impl Record {
    /// Build a record, truncating both columns to [`MAX_FIELD_CHARS`].
    pub fn new(id: RecordId, col1: impl Into<String>, col2: impl Into<String>) -> Self {
        Self {
            id,
            col1: truncate_field(col1.into()),
            col2: truncate_field(col2.into()),
        }
    }

    /// Overwrite both columns with the update's values.
    pub fn apply(&mut self, update: &RecordUpdate) {
        self.col1.clone_from(&update.col1);
        self.col2.clone_from(&update.col2);
    }
}

/// Full replacement of a record's columns.
///
/// There is no partial update: both columns are always written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    col1: String,
    col2: String,
}

impl RecordUpdate {
    pub fn new(col1: impl Into<String>, col2: impl Into<String>) -> Self {
        Self {
            col1: truncate_field(col1.into()),
            col2: truncate_field(col2.into()),
        }
    }

    pub fn col1(&self) -> &str {
        &self.col1
    }

    pub fn col2(&self) -> &str {
        &self.col2
    }
}

fn truncate_field(mut value: String) -> String {
    if let Some((byte_idx, _)) = value.char_indices().nth(MAX_FIELD_CHARS) {
        value.truncate(byte_idx);
    }
    value
}
