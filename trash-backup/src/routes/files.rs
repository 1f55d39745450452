use crate::error::AppError;
use crate::services::ingress::{save_payload, SavePayload};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// POST /api/save-file - write a hex-encoded payload into the backup directory
/// and announce it to observers.
pub async fn save_file(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SavePayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(payload) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected save-file body");
        AppError::BadRequest("Invalid JSON".into())
    })?;

    tracing::debug!(
        filename = %payload.filename,
        content_len = payload.file_content.len(),
        "Receiving file"
    );

    let saved = save_payload(&state.config.backup_dir, &payload).await?;
    state.hub.broadcast(&saved.filename).await;

    Ok(Json(json!({
        "success": true,
        "filename": saved.filename,
        "size": saved.size,
        "path": saved.path.to_string_lossy(),
    })))
}
