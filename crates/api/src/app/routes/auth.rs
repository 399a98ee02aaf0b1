//! Sign-in flow: `/login` → provider → `/getAToken`, and `/logout`.
//!
//! Session states: anonymous → state pending → authenticated. The pending
//! state is removed when the callback reads it, so a state value can be
//! redeemed at most once per cookie, and it expires after
//! [`PENDING_LOGIN_TTL_SECS`](crate::app::session::PENDING_LOGIN_TTL_SECS).

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tablegate_auth::{AuthorizationRequest, DEFAULT_SCOPES, IdentityClaims, state_matches};

use crate::app::errors::AppError;
use crate::app::session::{BrowserSession, CALLBACK_PATH};
use crate::app::views;
use crate::context::AppContext;

/// Query parameters the provider appends to the callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Why a callback did not produce a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// Returned state was missing or differs from the pending one.
    StateMismatch,
    /// The provider redirected back with an `error` parameter.
    ProviderError(String),
    /// Callback carried neither a code nor an error.
    MissingCode,
    /// The code could not be redeemed for identity claims.
    ExchangeFailed,
}

impl AuthFailure {
    pub fn code(&self) -> &'static str {
        match self {
            Self::StateMismatch => "state_mismatch",
            Self::ProviderError(_) => "provider_error",
            Self::MissingCode => "missing_code",
            Self::ExchangeFailed => "exchange_failed",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::StateMismatch => "The sign-in response did not match a pending sign-in request.",
            Self::ProviderError(_) => "The identity provider declined the sign-in.",
            Self::MissingCode => "The identity provider did not return an authorization code.",
            Self::ExchangeFailed => "The sign-in could not be completed with the identity provider.",
        }
    }

    fn render(self) -> Result<Response, AppError> {
        let html = views::render_auth_failed(self.code(), self.message())?;
        Ok((StatusCode::UNAUTHORIZED, Html(html)).into_response())
    }
}

fn callback_uri(ctx: &AppContext, headers: &HeaderMap) -> String {
    format!("{}{}", ctx.external_base(headers), CALLBACK_PATH)
}

fn scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

/// `GET /login`: start a round trip with a fresh state.
pub async fn login(
    Extension(ctx): Extension<AppContext>,
    mut session: BrowserSession,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let request = AuthorizationRequest::new(callback_uri(&ctx, &headers), DEFAULT_SCOPES);
    let url = ctx.identity.authorization_url(&request)?;
    session.begin_login(&request.state);

    tracing::info!(redirect_uri = %request.redirect_uri, "sign-in started");
    Ok((session, Redirect::to(&url)).into_response())
}

/// Validate the callback and redeem the code.
async fn complete_sign_in(
    ctx: &AppContext,
    session: &mut BrowserSession,
    headers: &HeaderMap,
    params: CallbackParams,
) -> Result<IdentityClaims, AuthFailure> {
    let pending = session.take_pending_state();
    if !state_matches(pending.as_deref(), params.state.as_deref()) {
        return Err(AuthFailure::StateMismatch);
    }

    if let Some(error) = params.error {
        tracing::warn!(
            error = %error,
            description = params.error_description.as_deref().unwrap_or_default(),
            "identity provider returned an error"
        );
        return Err(AuthFailure::ProviderError(error));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(AuthFailure::MissingCode);
    };

    match ctx
        .identity
        .exchange_code(&code, &scopes(), &callback_uri(ctx, headers))
        .await
    {
        Ok(claims) if !claims.is_empty() => Ok(claims),
        Ok(_) => Err(AuthFailure::ExchangeFailed),
        Err(e) => {
            tracing::warn!(error = %e, "authorization code exchange failed");
            Err(AuthFailure::ExchangeFailed)
        }
    }
}

/// `GET /getAToken`: OAuth callback.
pub async fn authorized(
    Extension(ctx): Extension<AppContext>,
    mut session: BrowserSession,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    match complete_sign_in(&ctx, &mut session, &headers, params).await {
        Ok(claims) => {
            tracing::info!(subject = ?claims.subject(), "signed in");
            session.sign_in(claims);
            Ok((session, Redirect::to("/")).into_response())
        }
        Err(failure) => {
            tracing::warn!(reason = failure.code(), "sign-in rejected");
            let page = failure.render()?;
            Ok((session, page).into_response())
        }
    }
}

/// `GET /logout`: drop the session and end the provider session too.
pub async fn logout(
    Extension(ctx): Extension<AppContext>,
    mut session: BrowserSession,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    session.clear();

    let home = format!("{}/", ctx.external_base(&headers));
    let url = ctx.identity.logout_url(&home)?;
    tracing::info!("signed out");
    Ok((session, Redirect::to(&url)).into_response())
}
