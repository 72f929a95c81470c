// src/handlers/auth.rs

use crate::{
    error::{AppError, Result},
    handlers::MessageResponse,
    middleware::SESSION_COOKIE,
    session::SessionUser,
    state::AppState,
};
use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use cookie::{time::Duration as CookieDuration, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login body, accepted as JSON or as an urlencoded HTML form.
#[derive(Debug)]
pub struct LoginPayload(pub LoginRequest);

#[async_trait]
impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.starts_with("application/x-www-form-urlencoded"));

        let request = if is_form {
            let Form(request) = Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
            request
        } else {
            let Json(request) = Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
            request
        };
        Ok(Self(request))
    }
}

/// Verifies the administrator credentials and starts a session.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    LoginPayload(request): LoginPayload,
) -> Result<Json<MessageResponse>> {
    let username = request.username.clone();

    let checker = state.clone();
    let valid = tokio::task::spawn_blocking(move || {
        checker
            .credentials
            .validate(&request.username, &request.password)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Credential check task failed: {e}")))?;

    if !valid {
        warn!("Failed admin login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let jar = cookies.signed(&state.cookie_key);

    // Drop any session the browser was already holding.
    if let Some(previous) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(previous.value()).await?;
    }

    let session = state.sessions.create(SessionUser { username }).await?;
    let max_age = i64::try_from(state.cookie_policy.max_age.as_secs()).unwrap_or(i64::MAX);
    let cookie = Cookie::build((SESSION_COOKIE, session.id))
        .path("/")
        .http_only(true)
        .secure(state.cookie_policy.secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age))
        .build();
    jar.add(cookie);

    info!(session.user = %session.user.username, "Admin login successful");
    Ok(Json(MessageResponse::new("Login successful")))
}

/// Ends the current session, if any. Safe to call repeatedly.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<MessageResponse>> {
    let jar = cookies.signed(&state.cookie_key);

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state
            .sessions
            .destroy(cookie.value())
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;
        jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
        info!("Admin logged out");
    }

    Ok(Json(MessageResponse::new("Logout successful")))
}
