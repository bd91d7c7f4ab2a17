use std::sync::Arc;

use crate::backends::OllamaClient;
use crate::config::GatewayConfig;
use crate::gateway::Gateway;

// app's shared state, read-only after startup
pub struct AppState {
    pub config: GatewayConfig,
    pub gateway: Gateway,
    // used directly by the health, model listing and reset routes
    pub ollama: Arc<OllamaClient>,
}
