//! Strongly-typed record identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Surrogate key of a record row (assigned by the database).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    /// Unsigned decimal digits only: no sign, whitespace or separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!("RecordId: '{s}' is not a number")));
        }
        let value = s
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("RecordId: {e}")))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_ids() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::new(42));
        assert_eq!("007".parse::<RecordId>().unwrap().get(), 7);
    }

    #[test]
    fn rejects_non_integer_ids() {
        assert!(matches!("abc".parse::<RecordId>(), Err(DomainError::InvalidId(_))));
        assert!("".parse::<RecordId>().is_err());
        assert!("1.5".parse::<RecordId>().is_err());
    }

    #[test]
    fn rejects_signs_whitespace_and_overflow() {
        for raw in ["+5", "-7", " 5", "5 ", "99999999999999999999"] {
            assert!(
                matches!(raw.parse::<RecordId>(), Err(DomainError::InvalidId(_))),
                "{raw:?} was accepted"
            );
        }
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&RecordId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
