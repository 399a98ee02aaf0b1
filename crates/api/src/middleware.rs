use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::app::session::{BrowserSession, LOGIN_PATH};
use crate::context::CurrentUser;

/// Login guard for protected routes.
///
/// Runs before the handler's extractors, so an anonymous `POST /edit/{id}` is
/// redirected without its body being read.
pub async fn require_login(session: BrowserSession, mut req: Request, next: Next) -> Response {
    match session.user() {
        Some(claims) => {
            req.extensions_mut().insert(CurrentUser::new(claims.clone()));
            next.run(req).await
        }
        None => Redirect::to(LOGIN_PATH).into_response(),
    }
}
