use std::sync::Arc;

use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::Key;

use tablegate_auth::{IdentityClaims, IdentityProvider};
use tablegate_infra::{AppConfig, RecordStore};

use crate::app::session::session_key;

/// Settings the HTTP layer needs from the process configuration.
#[derive(Clone)]
pub struct WebSettings {
    pub public_base_url: Option<String>,
    pub secret_key: String,
    pub secure_cookies: bool,
}

impl From<&AppConfig> for WebSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            public_base_url: cfg.public_base_url.clone(),
            secret_key: cfg.secret_key.clone(),
            secure_cookies: cfg.session_cookie_secure,
        }
    }
}

/// Everything a handler may touch, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub records: Arc<dyn RecordStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub settings: WebSettings,
    /// Encrypts the session cookie; derived from `settings.secret_key`.
    pub session_key: Key,
}

impl AppContext {
    pub fn new(
        records: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
        settings: WebSettings,
    ) -> Self {
        let session_key = session_key(&settings.secret_key);
        Self {
            records,
            identity,
            settings,
            session_key,
        }
    }

    /// Scheme + host the browser used to reach us, without trailing slash.
    pub fn external_base(&self, headers: &HeaderMap) -> String {
        external_base(self.settings.public_base_url.as_deref(), headers)
    }
}

/// Resolve the external base URL.
///
/// A configured base wins. Otherwise the first `X-Forwarded-Proto` /
/// `X-Forwarded-Host` values are trusted (the app runs behind a TLS-terminating
/// proxy), then `Host`, then `localhost`.
pub fn external_base(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = configured {
        return base.trim_end_matches('/').to_string();
    }

    let first = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let scheme = first("x-forwarded-proto").unwrap_or("http");
    let host = first("x-forwarded-host")
        .or_else(|| first(header::HOST.as_str()))
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}

/// The signed-in user for a request (inserted by the login guard).
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    claims: IdentityClaims,
}

impl CurrentUser {
    pub fn new(claims: IdentityClaims) -> Self {
        Self { claims }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.claims.display_name()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(name, value) in pairs {
            map.append(name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn configured_base_wins() {
        let h = headers(&[("host", "internal:8080"), ("x-forwarded-host", "proxy")]);
        assert_eq!(
            external_base(Some("https://records.contoso.com/"), &h),
            "https://records.contoso.com"
        );
    }

    #[test]
    fn forwarded_headers_override_host() {
        let h = headers(&[
            ("host", "10.0.0.4:8080"),
            ("x-forwarded-proto", "https, http"),
            ("x-forwarded-host", "records.contoso.com"),
        ]);
        assert_eq!(external_base(None, &h), "https://records.contoso.com");
    }

    #[test]
    fn falls_back_to_host_header_over_http() {
        let h = headers(&[("host", "127.0.0.1:3000")]);
        assert_eq!(external_base(None, &h), "http://127.0.0.1:3000");
        assert_eq!(external_base(None, &HeaderMap::new()), "http://localhost");
    }
}
