use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

pub async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "message": "Chat Gateway API",
        "version": env!("CARGO_PKG_VERSION"),
        "ollama_host": state.config.ollama.host,
        "ollama_port": state.config.ollama.port,
        "default_model": state.config.default_model,
        "conversation_history_size": 0
    }))
}

// Reports whether the local runtime answers, the gateway itself is always up
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ollama_connected = state.ollama.is_reachable().await;
    Json(json!({
        "status": "healthy",
        "ollama_connected": ollama_connected,
        "conversation_history_size": 0,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
