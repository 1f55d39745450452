use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET /api/test - liveness check for frontends
pub async fn test() -> impl IntoResponse {
    tracing::debug!("Test endpoint called");
    Json(json!({
        "status": "ok",
        "message": "Trash backup server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
