//! Internal routes.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.service.catalog().stats();

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "locales": {
            "allowed": state.service.allow_list().len(),
            "loaded": stats.loaded_locales,
            "fallback": state.service.allow_list().fallback(),
            "override_dir": stats.override_dir_enabled,
        }
    }))
}
