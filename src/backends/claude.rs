use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::{ChatBackend, GenerateCall};
use crate::config::ClaudeConfig;
use crate::error::{GatewayError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Client for the hosted Claude messages API. The key comes from the caller
/// on every request and is never stored.
pub struct ClaudeClient {
    client: reqwest::Client,
    config: ClaudeConfig,
}

impl ClaudeClient {
    pub fn new(client: reqwest::Client, config: ClaudeConfig) -> Self {
        Self { client, config }
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    pub async fn generate(&self, prompt: &str, api_key: &str) -> Result<String> {
        info!("Sending request to Claude API");

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Claude API request failed: {}", e);
                GatewayError::UpstreamError(format!("Claude API request failed: {}", e))
            })?;

        match res.status() {
            StatusCode::UNAUTHORIZED => {
                error!("Claude API authentication failed");
                return Err(GatewayError::AuthError);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                error!("Claude API rate limit exceeded");
                return Err(GatewayError::RateLimited);
            }
            status if !status.is_success() => {
                let text = res.text().await.unwrap_or_default();
                error!("Claude API error {}: {}", status.as_u16(), text);
                return Err(GatewayError::UpstreamError(format!(
                    "Claude API error: {}",
                    text
                )));
            }
            _ => {}
        }

        let parsed: MessagesResponse = res.json().await.map_err(|e| {
            GatewayError::UpstreamError(format!("Unexpected response format from Claude API: {}", e))
        })?;

        match parsed.content.into_iter().next().and_then(|block| block.text) {
            Some(text) => {
                info!(chars = text.chars().count(), "Claude response received");
                Ok(text)
            }
            None => {
                error!("Unexpected response format from Claude API");
                Err(GatewayError::UpstreamError(
                    "Unexpected response format from Claude API".to_string(),
                ))
            }
        }
    }
}

#[async_trait]
impl ChatBackend for ClaudeClient {
    fn name(&self) -> &'static str {
        "claude"
    }

    async fn generate(&self, call: GenerateCall<'_>) -> Result<String> {
        let api_key = call.api_key.ok_or(GatewayError::MissingCredential)?;
        ClaudeClient::generate(self, call.prompt, api_key).await
    }
}
