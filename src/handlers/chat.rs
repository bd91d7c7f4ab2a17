use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use crate::error::GatewayError;
use crate::metrics::{CHAT_FAILURES, CHAT_LATENCY, CHAT_REQUESTS};
use crate::models::{ChatRequest, ChatResponse};
use crate::state::AppState;

// Header the desktop client sends its Claude key in
pub const CLAUDE_KEY_HEADER: &str = "claude-api-key";

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, GatewayError> {
    CHAT_REQUESTS.inc();
    let start_time = Instant::now();

    let Json(request) = payload?;
    let auth_key = headers
        .get(CLAUDE_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let result = state.gateway.handle(&request, auth_key).await;

    CHAT_LATENCY.observe(start_time.elapsed().as_secs_f64());
    if let Err(e) = &result {
        CHAT_FAILURES.inc();
        error!(code = e.error_code(), "Error in chat endpoint: {}", e);
    }

    result.map(Json)
}
