use axum::{Json, response::IntoResponse};
use serde_json::json;
use tracing::info;

// The server keeps no history; these exist so older clients keep working.

pub async fn conversation_handler() -> impl IntoResponse {
    Json(json!({
        "conversation_history": [],
        "history_size": 0,
        "context_size_bytes": 0
    }))
}

pub async fn clear_conversation_handler() -> impl IntoResponse {
    info!("No server-side conversation history to clear");
    Json(json!({ "message": "No server-side conversation history to clear" }))
}
