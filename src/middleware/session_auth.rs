// src/middleware/session_auth.rs

use crate::{error::AppError, session::SessionUser, state::AppState};
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, warn};

/// Name of the cookie carrying the signed session id.
pub const SESSION_COOKIE: &str = "session_id";

/// Page unauthenticated browser navigations are sent to.
pub const LOGIN_PAGE: &str = "/login.html";

/// The logged-in administrator, attached to requests that pass the guard.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionUser);

fn is_api_request(req: &Request<Body>) -> bool {
    req.uri().path().starts_with("/api/")
}

/// Middleware gating protected routes on a live session.
///
/// API requests without one get a 401 JSON body; page loads are redirected
/// to the login page.
pub async fn session_auth_middleware(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let session_id = cookies
        .signed(&state.cookie_key)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    let user = match session_id {
        Some(id) => match state.sessions.get(&id).await {
            Ok(user) => user,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    match user {
        Some(user) => {
            debug!(session.user = %user.username, "Session authenticated");
            req.extensions_mut().insert(AuthenticatedUser(user));
            next.run(req).await
        }
        None if is_api_request(&req) => {
            warn!(url.path = %req.uri().path(), "API request rejected: no valid session");
            AppError::Unauthorized.into_response()
        }
        None => {
            debug!(url.path = %req.uri().path(), "Redirecting to login page");
            Redirect::to(LOGIN_PAGE).into_response()
        }
    }
}
