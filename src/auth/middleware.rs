//! Route guard middleware
//!
//! Authenticated users have no business on the login/register pages; the
//! guard bounces them back to the home view before the handler runs.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::session::SessionContext;

/// True if the path targets an auth view (case-insensitive substring match)
pub fn is_auth_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.contains("login") || path.contains("register")
}

/// Redirect already-authenticated users away from auth pages
pub async fn redirect_if_authenticated(
    ctx: SessionContext,
    req: Request,
    next: Next,
) -> Response {
    if is_auth_path(req.uri().path()) && ctx.is_authenticated() {
        return Redirect::to("/").into_response();
    }

    next.run(req).await
}
