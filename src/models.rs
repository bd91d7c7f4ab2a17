use serde::{Deserialize, Serialize};

// Body of POST /chat
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    // accepted for compatibility, there is no server-side history to reset
    #[serde(default)]
    pub reset_conversation: bool,
}

// Normalized answer, whichever backend produced it
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_history_size: usize,
    pub context_size_bytes: usize,
}

impl ChatResponse {
    pub fn new(prompt: &str, response: String) -> Self {
        Self {
            response,
            // stateless: nothing is ever kept between requests
            conversation_history_size: 0,
            context_size_bytes: prompt.len(),
        }
    }
}
