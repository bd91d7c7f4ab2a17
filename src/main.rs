mod backends;
mod config;
mod error;
mod gateway;
mod handlers;
mod metrics;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::backends::{ClaudeClient, OllamaClient};
use crate::config::{Args, GatewayConfig};
use crate::gateway::Gateway;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,tower_http=info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // parse cli arguments
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    // one pooled client shared by both upstreams
    let client = reqwest::Client::new();
    let ollama = Arc::new(OllamaClient::new(client.clone(), &config.ollama));
    let claude = Arc::new(ClaudeClient::new(client, config.claude.clone()));
    let gateway = Gateway::new(&config, ollama.clone(), claude);

    info!("Starting chat gateway");
    if ollama.is_reachable().await {
        info!("Connected to Ollama at {}", ollama.base_url());
    } else {
        // keep serving, the hosted backend still works
        error!("Ollama is not running or not accessible at {}", ollama.base_url());
        error!("Please start Ollama with: ollama serve");
    }

    let state = Arc::new(AppState {
        config,
        gateway,
        ollama,
    });
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gateway running on http://localhost:{}", args.port);
    info!("Default model: {}", args.default_model);
    info!("Hosted model selector: {}", args.hosted_model_id);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
