use clap::Parser;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "chat-gateway")]
#[command(about = "Stateless chat gateway for Ollama and the Claude API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "GATEWAY_PORT", default_value_t = 8000)]
    pub port: u16,

    // Ollama host, a bare hostname or a full http(s) URL
    #[arg(long, env = "GATEWAY_OLLAMA_HOST", default_value = "localhost")]
    pub ollama_host: String,

    #[arg(long, env = "GATEWAY_OLLAMA_PORT", default_value_t = 11434)]
    pub ollama_port: u16,

    // Model used when a chat request does not name one
    #[arg(short = 'm', long, env = "GATEWAY_DEFAULT_MODEL", default_value = "mistral")]
    pub default_model: String,

    // Model selector that routes a request to the Claude API
    #[arg(long, env = "GATEWAY_HOSTED_MODEL_ID", default_value = "claude-sonnet-4-5")]
    pub hosted_model_id: String,

    #[arg(
        long,
        env = "GATEWAY_CLAUDE_API_URL",
        default_value = "https://api.anthropic.com/v1/messages"
    )]
    pub claude_api_url: String,

    // Upstream model name sent to the Claude API
    #[arg(long, env = "GATEWAY_CLAUDE_MODEL", default_value = "claude-sonnet-4-5-20250929")]
    pub claude_model: String,

    #[arg(long, env = "GATEWAY_CLAUDE_MAX_TOKENS", default_value_t = 4000)]
    pub claude_max_tokens: u32,
}

/// Settings for the local Ollama runtime.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
}

impl OllamaConfig {
    /// Base URL of the runtime. Adds `http://` unless the host already
    /// carries a scheme.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        let with_scheme = if host.starts_with("http") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };
        format!("{}:{}", with_scheme, self.port)
    }
}

/// Settings for the hosted Claude messages API.
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
}

/// Everything the gateway needs, resolved once at startup and injected.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub ollama: OllamaConfig,
    pub claude: ClaudeConfig,
    pub default_model: String,
    pub hosted_model_id: String,
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            ollama: OllamaConfig {
                host: args.ollama_host.clone(),
                port: args.ollama_port,
            },
            claude: ClaudeConfig {
                api_url: args.claude_api_url.clone(),
                model: args.claude_model.clone(),
                max_tokens: args.claude_max_tokens,
            },
            default_model: args.default_model.clone(),
            hosted_model_id: args.hosted_model_id.clone(),
        }
    }
}
