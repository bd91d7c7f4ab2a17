use std::sync::Arc;

use tracing::{info, instrument};

use crate::backends::{ChatBackend, GenerateCall};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::metrics::BACKEND_CALLS;
use crate::models::{ChatRequest, ChatResponse};

const PREVIEW_CHARS: usize = 100;

/// Which upstream serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Local,
    Hosted,
}

/// Routes prompts to the local runtime or the hosted API. Holds no
/// per-request state; every call is independent.
pub struct Gateway {
    default_model: String,
    hosted_model_id: String,
    local: Arc<dyn ChatBackend>,
    hosted: Arc<dyn ChatBackend>,
}

impl Gateway {
    pub fn new(
        config: &GatewayConfig,
        local: Arc<dyn ChatBackend>,
        hosted: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            default_model: config.default_model.clone(),
            hosted_model_id: config.hosted_model_id.clone(),
            local,
            hosted,
        }
    }

    pub fn route_for(&self, model: &str) -> Route {
        if model == self.hosted_model_id {
            Route::Hosted
        } else {
            Route::Local
        }
    }

    fn backend(&self, route: Route) -> &dyn ChatBackend {
        match route {
            Route::Local => self.local.as_ref(),
            Route::Hosted => self.hosted.as_ref(),
        }
    }

    /// Entry point for a decoded `POST /chat` body.
    pub async fn handle(
        &self,
        request: &ChatRequest,
        auth_key: Option<&str>,
    ) -> Result<ChatResponse> {
        if request.reset_conversation {
            info!("Reset requested but no server-side history to reset");
        }
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        self.handle_chat(&request.prompt, model, auth_key).await
    }

    #[instrument(skip(self, prompt, auth_key))]
    pub async fn handle_chat(
        &self,
        prompt: &str,
        model: &str,
        auth_key: Option<&str>,
    ) -> Result<ChatResponse> {
        if prompt.trim().is_empty() {
            return Err(GatewayError::InvalidInput("Prompt cannot be empty".to_string()));
        }

        let route = self.route_for(model);
        let api_key = auth_key.map(str::trim).filter(|key| !key.is_empty());
        if route == Route::Hosted && api_key.is_none() {
            return Err(GatewayError::MissingCredential);
        }

        info!("Processing prompt: {}", preview(prompt));

        let backend = self.backend(route);
        BACKEND_CALLS.with_label_values(&[backend.name()]).inc();
        let response = backend
            .generate(GenerateCall {
                prompt,
                model,
                api_key,
            })
            .await?;

        info!(backend = backend.name(), user = %prompt, ai = %response, "exchange complete");

        Ok(ChatResponse::new(prompt, response))
    }
}

// First PREVIEW_CHARS characters, with an ellipsis when cut
fn preview(prompt: &str) -> String {
    match prompt.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &prompt[..cut]),
        None => prompt.to_string(),
    }
}
