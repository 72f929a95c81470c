// src/handlers/data.rs

use crate::{
    error::{AppError, Result},
    groups::GroupsDocument,
    handlers::MessageResponse,
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Returns the whole groups document.
#[axum::debug_handler]
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<GroupsDocument>> {
    let document = state.repository.load().await?;
    info!(
        session.user = %user.username,
        groups.count = document.groups.len(),
        "Serving groups document"
    );
    Ok(Json(document))
}

/// Replaces the groups document with the request body.
///
/// Anything other than a JSON object with a `groups` array is rejected with
/// 400 before the file is touched.
#[axum::debug_handler]
pub async fn save_data(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "Rejected unparsable groups payload");
        AppError::rejected(e.status(), "Invalid data format.")
    })?;

    let document = GroupsDocument::from_payload(payload)?;
    state.repository.save(&document).await?;

    info!(
        session.user = %user.username,
        groups.count = document.groups.len(),
        groups.emails = document.total_emails(),
        "Groups document updated"
    );
    Ok(Json(MessageResponse::new("Data saved successfully!")))
}
