use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{ChatBackend, GenerateCall};
use crate::config::OllamaConfig;
use crate::error::{GatewayError, Result};

// Clients send this line when the user starts a fresh chat
const RESET_MARKER: &str = "SYSTEM: You are starting a completely new conversation";

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// Ollama API request format
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    fn new(model: &'a str, prompt: &'a str) -> Self {
        let options = is_reset_prompt(prompt).then(GenerateOptions::fresh_start);
        Self {
            model,
            prompt,
            stream: false,
            options,
        }
    }
}

// Fixed decoding parameters sent with reset prompts
#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_ctx: u32,
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
}

impl GenerateOptions {
    fn fresh_start() -> Self {
        Self {
            num_ctx: 0,
            temperature: 0.7,
            top_p: 0.9,
            repeat_penalty: 1.1,
        }
    }
}

// Ollama API response format, either field may be absent
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    name: &'a str,
    stream: bool,
}

/// Result of a best-effort model reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    Attempted,
    Failed(String),
}

fn is_reset_prompt(prompt: &str) -> bool {
    prompt.contains(RESET_MARKER)
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_connect() {
        GatewayError::UpstreamUnavailable(
            "Ollama is not running. Please start Ollama with: ollama serve".to_string(),
        )
    } else {
        GatewayError::UpstreamError(format!("Request failed: {}", err))
    }
}

/// Client for the local Ollama runtime.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(client: reqwest::Client, config: &OllamaConfig) -> Self {
        Self {
            client,
            base_url: config.base_url(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Non-streaming generation via `/api/generate`.
    #[instrument(skip(self, prompt))]
    pub async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let body = GenerateRequest::new(model, prompt);
        info!(
            context_bytes = prompt.len(),
            reset = body.options.is_some(),
            "sending context to Ollama"
        );

        let url = format!("{}/api/generate", self.base_url);
        debug!("POST {}", url);
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamError(format!(
                "Ollama API error: {}",
                status.as_u16()
            )));
        }

        let text = res.text().await.map_err(transport_error)?;
        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Unexpected response from Ollama: {}", text);
            GatewayError::ProtocolError(format!("Unexpected response format from Ollama: {}", e))
        })?;

        match parsed {
            GenerateResponse {
                response: Some(response),
                ..
            } => Ok(response),
            GenerateResponse {
                error: Some(err), ..
            } => Err(GatewayError::UpstreamError(format!("Ollama error: {}", err))),
            _ => {
                error!("Unexpected response from Ollama: {}", text);
                Err(GatewayError::ProtocolError(
                    "Unexpected response format from Ollama".to_string(),
                ))
            }
        }
    }

    /// True when `/api/tags` answers with a success status.
    pub async fn is_reachable(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(res) => res.status().is_success(),
            Err(e) => {
                warn!("Error checking Ollama status: {}", e);
                false
            }
        }
    }

    /// Models installed in the runtime, as Ollama describes them.
    pub async fn list_models(&self) -> Result<Vec<Value>> {
        let url = format!("{}/api/tags", self.base_url);
        let res = self.client.get(&url).send().await.map_err(transport_error)?;

        if !res.status().is_success() {
            return Err(GatewayError::UpstreamError(
                "Failed to fetch models from Ollama".to_string(),
            ));
        }

        let tags: TagsResponse = res.json().await.map_err(|e| {
            GatewayError::ProtocolError(format!("Error fetching models: {}", e))
        })?;
        Ok(tags.models)
    }

    /// Stops any running generation for `model` and pulls it again.
    #[instrument(skip(self))]
    pub async fn reset_model(&self, model: &str) -> ResetOutcome {
        info!("Attempting to reset Ollama model");

        // ignore failures here, the model may simply not be loaded
        let stop = GenerateRequest::new(model, "STOP");
        let _ = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&stop)
            .send()
            .await;

        let pull = PullRequest {
            name: model,
            stream: false,
        };
        match self
            .client
            .post(format!("{}/api/pull", self.base_url))
            .json(&pull)
            .send()
            .await
        {
            Ok(res) if res.status().is_success() => {
                info!("Model reset successfully");
                ResetOutcome::Reset
            }
            Ok(res) => {
                warn!(status = res.status().as_u16(), "Could not reset model");
                ResetOutcome::Attempted
            }
            Err(e) => {
                error!("Error resetting model: {}", e);
                ResetOutcome::Failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(&self, call: GenerateCall<'_>) -> Result<String> {
        OllamaClient::generate(self, call.prompt, call.model).await
    }
}
