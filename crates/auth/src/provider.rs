use async_trait::async_trait;
use thiserror::Error;

use crate::{AuthorizationRequest, IdentityClaims};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity provider rejected the request: {error}")]
    Rejected {
        error: String,
        description: Option<String>,
    },

    #[error("token response did not contain an id_token")]
    MissingIdToken,

    #[error("id_token could not be decoded: {0}")]
    InvalidIdToken(#[from] jsonwebtoken::errors::Error),

    #[error("invalid identity provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Confidential-client side of the OAuth2 authorization-code flow.
///
/// Implementations are constructed once per process and shared across
/// requests; they hold no per-login state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to for sign-in.
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, IdentityError>;

    /// Redeem an authorization code for the signed-in user's claims.
    async fn exchange_code(
        &self,
        code: &str,
        scopes: &[String],
        redirect_uri: &str,
    ) -> Result<IdentityClaims, IdentityError>;

    /// End-session URL that returns the browser to `post_logout_redirect_uri`.
    fn logout_url(&self, post_logout_redirect_uri: &str) -> Result<String, IdentityError>;
}
