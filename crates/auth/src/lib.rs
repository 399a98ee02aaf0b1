//! `tablegate-auth`: identity delegation to Microsoft Entra.
//!
//! This crate knows about OAuth2/OIDC but nothing about HTTP routing or
//! sessions; the API layer decides what to do with the results.

pub mod claims;
pub mod entra;
pub mod provider;
pub mod state;

pub use claims::IdentityClaims;
pub use entra::{EntraIdentityProvider, EntraSettings, DEFAULT_AUTHORITY_HOST};
pub use provider::{IdentityError, IdentityProvider};
pub use state::{AuthorizationRequest, DEFAULT_SCOPES, new_state_token, state_matches};
