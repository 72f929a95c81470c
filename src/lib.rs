// src/lib.rs

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod groups;
pub mod handlers;
pub mod middleware;
pub mod session;
pub mod state;

use crate::handlers::{get_data, login, logout, save_data, serve_index};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Request as AxumRequest},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Instant};
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub use config::{Settings, SettingsOverrides};
pub use error::{AppError, Result};
pub use state::AppState;

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Builds the router: login/logout, the guarded editor page and data API,
/// and the public directory for everything else.
pub fn create_router(state: Arc<AppState>) -> Router {
    // The editor page is never served from here, under any spelling.
    let assets: Router = Router::new()
        .fallback_service(
            ServeDir::new(&state.public_dir).append_index_html_on_directories(false),
        )
        .layer(axum::middleware::from_fn(middleware::public_asset_filter));

    let protected = Router::new()
        .route("/api/data", get(get_data).post(save_data))
        .route("/", get(serve_index))
        .route("/index.html", get(serve_index))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::session_auth_middleware,
        ));

    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected)
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(middleware::MAX_REQUEST_SIZE))
        .layer(axum::middleware::from_fn(
            middleware::request_size_limit_middleware,
        ))
        .layer(CookieManagerLayer::new())
        .layer(axum::middleware::from_fn(trace_requests))
        .with_state(state)
}

/// Middleware adding a request id span, an `X-Request-ID` header and a completion log line.
async fn trace_requests(
    mut req: AxumRequest<Body>,
    next: axum::middleware::Next,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        http.method = %method,
        url.path = %path,
    );

    req.extensions_mut().insert(request_id);

    async move {
        let mut response = next.run(req).await;
        let elapsed = start_time.elapsed();

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(X_REQUEST_ID.clone(), value);
        }

        info!(
            http.response.duration = ?elapsed,
            http.status_code = response.status().as_u16(),
            "Finished processing request"
        );

        response
    }
    .instrument(span)
    .await
}

/// Loads settings, builds the shared state and returns the ready-to-serve router.
pub fn run(overrides: &SettingsOverrides) -> Result<(Router, Settings)> {
    info!("Starting group configuration admin panel...");

    let settings = Settings::load(overrides)?;
    let state = Arc::new(AppState::new(&settings)?);
    info!(
        groups.path = %settings.groups_path().display(),
        "Application state initialized successfully."
    );

    Ok((create_router(state), settings))
}
