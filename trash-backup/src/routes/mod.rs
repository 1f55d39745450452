pub mod explorer;
pub mod files;
pub mod health;

use crate::state::AppState;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(explorer::index))
        .route("/api/tree", get(explorer::tree))
        .route("/api/save-file", post(files::save_file))
        .route("/api/test", get(health::test))
        .route("/ws", get(crate::ws::observer::ws_handler))
        .nest_service("/files", ServeDir::new(&state.config.backup_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
