use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use tablegate_auth::IdentityError;
use tablegate_infra::StoreError;

/// Failures that abort a request.
///
/// Only `NotFound` is meaningful to the browser; everything else is logged
/// and answered with a generic 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("record store error: {0}")]
    Store(StoreError),

    #[error("session encoding error: {0}")]
    SessionEncoding(#[from] serde_json::Error),

    #[error("application context missing from request")]
    MissingContext,

    #[error("render error: {0}")]
    Render(#[from] askama::Error),

    #[error("identity provider error: {0}")]
    Identity(#[from] IdentityError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
