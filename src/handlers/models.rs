use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::error;

use crate::backends::ResetOutcome;
use crate::error::GatewayError;
use crate::state::AppState;

pub async fn models_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, GatewayError> {
    let models = state.ollama.list_models().await.map_err(|e| {
        error!("Error fetching models: {}", e);
        e
    })?;
    Ok(Json(json!({ "models": models })))
}

// Best effort, always answers 200
pub async fn reset_model_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = match state.ollama.reset_model(&state.config.default_model).await {
        ResetOutcome::Reset => json!({ "message": "Model reset successfully" }),
        ResetOutcome::Attempted => json!({ "message": "Model reset attempted" }),
        ResetOutcome::Failed(err) => json!({ "message": "Error resetting model", "error": err }),
    };
    Json(body)
}
