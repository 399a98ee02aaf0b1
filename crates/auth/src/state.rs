//! Anti-forgery state for the authorization-code round trip.

use uuid::Uuid;

/// Scopes requested at login, on top of the reserved OIDC scopes.
pub const DEFAULT_SCOPES: &[&str] = &["User.Read"];

/// Generate a fresh, unguessable state value.
pub fn new_state_token() -> String {
    Uuid::new_v4().to_string()
}

/// A state matches only when both sides are present and byte-for-byte equal.
pub fn state_matches(expected: Option<&str>, returned: Option<&str>) -> bool {
    match (expected, returned) {
        (Some(expected), Some(returned)) => !expected.is_empty() && expected == returned,
        _ => false,
    }
}

/// One login round trip: lives from `/login` until the callback consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub state: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl AuthorizationRequest {
    /// Start a new round trip with a freshly generated state.
    pub fn new(redirect_uri: impl Into<String>, scopes: &[&str]) -> Self {
        Self {
            state: new_state_token(),
            redirect_uri: redirect_uri.into(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }
}
