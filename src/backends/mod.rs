mod claude;
mod ollama;

pub use claude::ClaudeClient;
pub use ollama::{OllamaClient, ResetOutcome};

use async_trait::async_trait;

use crate::error::Result;

/// Everything a backend may need for one generation. Each backend reads the
/// fields it cares about: Ollama the model, Claude the key.
#[derive(Debug, Clone, Copy)]
pub struct GenerateCall<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub api_key: Option<&'a str>,
}

/// Single capability shared by the upstream clients.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn generate(&self, call: GenerateCall<'_>) -> Result<String>;
}
