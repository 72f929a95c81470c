// src/handlers/pages.rs

use crate::{
    error::{AppError, Result},
    state::AppState,
};
use axum::{extract::State, response::Html};
use std::sync::Arc;

/// Serves the editor page from the public directory.
#[axum::debug_handler]
pub async fn serve_index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let path = state.public_dir.join("index.html");
    let page = tokio::fs::read_to_string(&path).await.map_err(|e| {
        AppError::Internal(format!("Editor page unavailable at {}: {e}", path.display()))
    })?;
    Ok(Html(page))
}
