//! Browser-held session and the paths of the sign-in flow.
//!
//! The whole session lives in one encrypted cookie keyed from the app secret:
//! the pending sign-in state between `/login` and the callback, and the
//! signed-in user's claims. Nothing is kept server-side, so abandoned logins
//! cost nothing and sessions survive a restart as long as the secret does.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use tablegate_auth::IdentityClaims;

use crate::app::errors::AppError;
use crate::context::AppContext;

pub const SESSION_COOKIE_NAME: &str = "tablegate.session";

pub const LOGIN_PATH: &str = "/login";
pub const CALLBACK_PATH: &str = "/getAToken";
pub const LOGOUT_PATH: &str = "/logout";

/// Seconds a `/login` round trip may take before its state is refused.
pub const PENDING_LOGIN_TTL_SECS: i64 = 600;

/// Cookie encryption key for an application secret.
pub fn session_key(secret: &str) -> Key {
    // Key needs 64 bytes; SHA-512 stretches any secret to that.
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

/// Anti-forgery state issued by `/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub state: String,
    /// Unix seconds.
    pub issued_at: i64,
}

impl PendingLogin {
    pub fn new(state: impl Into<String>, issued_at: i64) -> Self {
        Self {
            state: state.into(),
            issued_at,
        }
    }

    /// The state, unless the round trip is older than [`PENDING_LOGIN_TTL_SECS`].
    pub fn state_at(&self, now: i64) -> Option<&str> {
        let age = now - self.issued_at;
        (0..=PENDING_LOGIN_TTL_SECS)
            .contains(&age)
            .then_some(self.state.as_str())
    }
}

/// Cookie payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingLogin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<IdentityClaims>,
}

impl SessionData {
    fn is_empty(&self) -> bool {
        self.pending.is_none() && self.user.is_none()
    }
}

/// Request-scoped session.
///
/// Extract it to read the cookie; return it as part of the response to
/// persist changes. A cookie that fails to decrypt or decode reads as an
/// anonymous session.
pub struct BrowserSession {
    jar: PrivateCookieJar,
    data: SessionData,
    secure: bool,
    changed: bool,
}

impl BrowserSession {
    pub fn load(jar: PrivateCookieJar, secure: bool) -> Self {
        let data = jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default();
        Self {
            jar,
            data,
            secure,
            changed: false,
        }
    }

    /// Claims of the signed-in user, if any.
    pub fn user(&self) -> Option<&IdentityClaims> {
        self.data.user.as_ref().filter(|claims| !claims.is_empty())
    }

    /// Remember `state` for the callback, replacing any earlier one.
    pub fn begin_login(&mut self, state: &str) {
        self.data.pending = Some(PendingLogin::new(state, Utc::now().timestamp()));
        self.changed = true;
    }

    /// Consume the pending state. Expired states are dropped and not returned.
    pub fn take_pending_state(&mut self) -> Option<String> {
        let pending = self.data.pending.take()?;
        self.changed = true;
        pending.state_at(Utc::now().timestamp()).map(str::to_string)
    }

    pub fn sign_in(&mut self, claims: IdentityClaims) {
        self.data.pending = None;
        self.data.user = Some(claims);
        self.changed = true;
    }

    pub fn clear(&mut self) {
        self.data = SessionData::default();
        self.changed = true;
    }

    fn into_jar(self) -> Result<PrivateCookieJar, serde_json::Error> {
        if !self.changed {
            return Ok(self.jar);
        }
        if self.data.is_empty() {
            return Ok(self.jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/")));
        }

        let value = serde_json::to_string(&self.data)?;
        // Lax: the provider's redirect back to the callback is a cross-site
        // top-level GET that must carry the cookie.
        let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);
        Ok(self.jar.add(cookie))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BrowserSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AppContext>()
            .ok_or(AppError::MissingContext)?;
        let jar = PrivateCookieJar::from_headers(&parts.headers, ctx.session_key.clone());
        Ok(Self::load(jar, ctx.settings.secure_cookies))
    }
}

impl IntoResponseParts for BrowserSession {
    type Error = AppError;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let jar = self.into_jar()?;
        jar.into_response_parts(res).map_err(|never| match never {})
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};
    use axum::response::IntoResponse;
    use serde_json::json;

    use super::*;

    fn claims() -> IdentityClaims {
        serde_json::from_value(json!({ "name": "Ada", "oid": "u-1" })).unwrap()
    }

    /// Persist `session` and return the `Set-Cookie` header it produced.
    fn set_cookie(session: BrowserSession) -> Option<String> {
        let res = (session, "ok").into_response();
        res.headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    /// Load a session from a `Set-Cookie` header value, as a browser would send it back.
    fn reload(set_cookie: &str, key: &Key) -> BrowserSession {
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        BrowserSession::load(PrivateCookieJar::from_headers(&headers, key.clone()), false)
    }

    fn fresh(key: &Key) -> BrowserSession {
        BrowserSession::load(PrivateCookieJar::new(key.clone()), false)
    }

    #[test]
    fn pending_state_expires() {
        let pending = PendingLogin::new("s", 1_000);
        assert_eq!(pending.state_at(1_000), Some("s"));
        assert_eq!(pending.state_at(1_000 + PENDING_LOGIN_TTL_SECS), Some("s"));
        assert_eq!(pending.state_at(1_001 + PENDING_LOGIN_TTL_SECS), None);
        assert_eq!(pending.state_at(999), None);
    }

    #[test]
    fn expired_pending_state_is_dropped_when_taken() {
        let key = session_key("k");
        let mut session = fresh(&key);
        session.data.pending = Some(PendingLogin::new("old", 0));
        assert_eq!(session.take_pending_state(), None);
        assert!(session.data.pending.is_none());
    }

    #[test]
    fn state_and_user_round_trip_through_the_cookie() {
        let key = session_key("k");
        let mut session = fresh(&key);
        session.begin_login("plain-state-marker");
        let cookie = set_cookie(session).expect("cookie written");
        assert!(cookie.starts_with(SESSION_COOKIE_NAME));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("plain-state-marker"), "payload must be encrypted");

        let mut session = reload(&cookie, &key);
        assert_eq!(session.take_pending_state().as_deref(), Some("plain-state-marker"));
        session.sign_in(claims());
        let cookie = set_cookie(session).unwrap();

        let mut session = reload(&cookie, &key);
        assert_eq!(session.user(), Some(&claims()));
        assert_eq!(session.take_pending_state(), None);
    }

    #[test]
    fn cookie_from_another_secret_reads_as_anonymous() {
        let mut session = fresh(&session_key("first"));
        session.sign_in(claims());
        let cookie = set_cookie(session).unwrap();

        let session = reload(&cookie, &session_key("second"));
        assert_eq!(session.user(), None);
    }

    #[test]
    fn untouched_session_writes_no_cookie() {
        assert_eq!(set_cookie(fresh(&session_key("k"))), None);
    }

    #[test]
    fn cleared_session_removes_the_cookie() {
        let key = session_key("k");
        let mut session = fresh(&key);
        session.sign_in(claims());
        let cookie = set_cookie(session).unwrap();

        let mut session = reload(&cookie, &key);
        session.clear();
        let removal = set_cookie(session).expect("removal cookie");
        assert!(removal.starts_with(&format!("{SESSION_COOKIE_NAME}=;")), "{removal}");
        assert!(removal.contains("Max-Age=0"), "{removal}");
    }
}
