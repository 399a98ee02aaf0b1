//! HTTP application wiring (Axum router).
//!
//! - `routes/`: HTTP handlers (records, sign-in flow, health)
//! - `session.rs`: cookie-held session and well-known paths
//! - `views.rs`: HTML rendering
//! - `errors.rs`: error-to-response mapping

use axum::{Extension, Router, middleware::from_fn, routing::{get, post}};
use tower::ServiceBuilder;

use crate::context::AppContext;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod session;
pub mod views;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(ctx: AppContext) -> Router {
    // Protected routes: require a signed-in session.
    let protected = Router::new()
        .route("/", get(routes::records::index))
        .route("/edit/:id", post(routes::records::edit))
        .route_layer(from_fn(middleware::require_login));

    Router::new()
        .route("/health", get(routes::system::health))
        .route(session::LOGIN_PATH, get(routes::auth::login))
        .route(session::CALLBACK_PATH, get(routes::auth::authorized))
        .route(session::LOGOUT_PATH, get(routes::auth::logout))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(ctx)))
}
