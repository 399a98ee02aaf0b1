//! Microsoft Entra ID (v2 endpoints) confidential client.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use url::Url;

use crate::{AuthorizationRequest, IdentityClaims, IdentityError, IdentityProvider};

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Scopes Entra always grants alongside the requested ones.
const RESERVED_SCOPES: &[&str] = &["openid", "profile", "offline_access"];

/// App registration details for one tenant.
#[derive(Clone, PartialEq, Eq)]
pub struct EntraSettings {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub authority_host: String,
}

impl EntraSettings {
    /// `{authority_host}/{tenant_id}`, e.g. `https://login.microsoftonline.com/<tenant>`.
    pub fn authority(&self) -> String {
        format!(
            "{}/{}",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/oauth2/v2.0/{name}", self.authority())
    }
}

impl core::fmt::Debug for EntraSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntraSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct EntraIdentityProvider {
    settings: EntraSettings,
    http: reqwest::Client,
}

impl EntraIdentityProvider {
    pub fn new(settings: EntraSettings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    pub fn with_client(settings: EntraSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    fn scope_param(scopes: &[String]) -> String {
        let mut all: Vec<&str> = scopes.iter().map(String::as_str).collect();
        for reserved in RESERVED_SCOPES {
            if !all.contains(reserved) {
                all.push(reserved);
            }
        }
        all.join(" ")
    }

    /// Decode the id token returned by the token endpoint.
    ///
    /// The token arrives directly from the provider over TLS, so only audience
    /// and expiry are checked (OIDC Core 3.1.3.7).
    fn decode_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.set_audience(&[self.settings.client_id.as_str()]);

        let data = jsonwebtoken::decode::<IdentityClaims>(
            id_token,
            &DecodingKey::from_secret(&[]),
            &validation,
        )?;
        Ok(data.claims)
    }
}

#[async_trait]
impl IdentityProvider for EntraIdentityProvider {
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, IdentityError> {
        let scope = Self::scope_param(&request.scopes);
        let url = Url::parse_with_params(
            &self.settings.endpoint("authorize"),
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", request.redirect_uri.as_str()),
                ("response_mode", "query"),
                ("scope", scope.as_str()),
                ("state", request.state.as_str()),
            ],
        )?;
        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        code: &str,
        scopes: &[String],
        redirect_uri: &str,
    ) -> Result<IdentityClaims, IdentityError> {
        let scope = Self::scope_param(scopes);
        let form = [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
        ];

        let res = self
            .http
            .post(self.settings.endpoint("token"))
            .form(&form)
            .send()
            .await?;
        let status = res.status();
        let body: TokenResponse = res.json().await?;

        if let Some(error) = body.error {
            return Err(IdentityError::Rejected {
                error,
                description: body.error_description,
            });
        }
        if !status.is_success() {
            return Err(IdentityError::Rejected {
                error: status.to_string(),
                description: body.error_description,
            });
        }

        let id_token = body.id_token.ok_or(IdentityError::MissingIdToken)?;
        let claims = self.decode_id_token(&id_token)?;
        tracing::debug!(subject = ?claims.subject(), "id token accepted");
        Ok(claims)
    }

    fn logout_url(&self, post_logout_redirect_uri: &str) -> Result<String, IdentityError> {
        let url = Url::parse_with_params(
            &self.settings.endpoint("logout"),
            &[("post_logout_redirect_uri", post_logout_redirect_uri)],
        )?;
        Ok(url.into())
    }
}
