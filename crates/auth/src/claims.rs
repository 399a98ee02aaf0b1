use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity assertions decoded from an OIDC id token.
///
/// Kept as an open JSON object: Entra emits a tenant-dependent claim set and
/// the session stores whatever the provider returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityClaims(Map<String, Value>);

impl IdentityClaims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// String-valued claim, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Stable user identifier (`oid` for Entra, falling back to `sub`).
    pub fn subject(&self) -> Option<&str> {
        self.get_str("oid").or_else(|| self.get_str("sub"))
    }

    /// Human-readable name for the page header.
    pub fn display_name(&self) -> Option<&str> {
        ["name", "preferred_username", "email"]
            .into_iter()
            .find_map(|key| self.get_str(key).filter(|v| !v.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for IdentityClaims {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}
