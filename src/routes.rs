use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    chat_handler, clear_conversation_handler, conversation_handler, health_handler,
    metrics_handler, models_handler, reset_model_handler, root_handler,
};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/models", get(models_handler))
        .route("/reset-model", post(reset_model_handler))
        .route(
            "/conversation",
            get(conversation_handler).delete(clear_conversation_handler),
        )
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // the desktop client calls from its own origin
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{ChatBackend, ClaudeClient, GenerateCall, OllamaClient};
    use crate::config::{Args, ClaudeConfig, GatewayConfig, OllamaConfig};
    use crate::error::Result;
    use crate::gateway::Gateway;
    use crate::handlers::CLAUDE_KEY_HEADER;
    use crate::test_support::{spawn_upstream, unused_port};
    use async_trait::async_trait;
    use axum::{
        Json,
        body::Body,
        http::{Request, StatusCode},
    };
    use clap::Parser;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct Echo;

    #[async_trait]
    impl ChatBackend for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn generate(&self, call: GenerateCall<'_>) -> Result<String> {
            Ok(format!("{}: {}", call.model, call.prompt))
        }
    }

    fn app_with(ollama_port: u16, hosted: Arc<dyn ChatBackend>) -> Router {
        let mut config = GatewayConfig::from(&Args::parse_from(["chat-gateway"]));
        config.ollama = OllamaConfig {
            host: "127.0.0.1".into(),
            port: ollama_port,
        };
        let ollama = Arc::new(OllamaClient::new(reqwest::Client::new(), &config.ollama));
        let gateway = Gateway::new(&config, Arc::new(Echo), hosted);
        router(Arc::new(AppState {
            config,
            gateway,
            ollama,
        }))
    }

    async fn app() -> Router {
        app_with(unused_port().await, Arc::new(Echo))
    }

    fn chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn chat_uses_default_model() {
        let (status, body) = send(app().await, chat(r#"{"prompt": "hello"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "response": "mistral: hello",
                "conversation_history_size": 0,
                "context_size_bytes": 5
            })
        );
    }

    #[tokio::test]
    async fn blank_prompt_is_a_bad_request() {
        let (status, body) = send(app().await, chat(r#"{"prompt": "   "}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_INPUT");
        assert_eq!(body["detail"], "Prompt cannot be empty");
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let (status, body) = send(app().await, chat(r#"{"model": "mistral"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn hosted_model_without_header_is_a_bad_request() {
        let request = chat(r#"{"prompt": "hi", "model": "claude-sonnet-4-5"}"#);
        let (status, body) = send(app().await, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "MISSING_CREDENTIAL");
    }

    #[tokio::test]
    async fn hosted_auth_failure_keeps_its_status() {
        let upstream = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"type": "error"}))) }),
        );
        let port = spawn_upstream(upstream).await;
        let claude = ClaudeClient::new(
            reqwest::Client::new(),
            ClaudeConfig {
                api_url: format!("http://127.0.0.1:{}/v1/messages", port),
                model: "claude-sonnet-4-5-20250929".into(),
                max_tokens: 4000,
            },
        );
        let app = app_with(unused_port().await, Arc::new(claude));

        let mut request = chat(r#"{"prompt": "hi", "model": "claude-sonnet-4-5"}"#);
        request
            .headers_mut()
            .insert(CLAUDE_KEY_HEADER, "sk-wrong".parse().unwrap());
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "AUTH_ERROR");
    }

    #[tokio::test]
    async fn health_reports_unreachable_runtime() {
        let (status, body) = send(app().await, get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["ollama_connected"], false);
        assert_eq!(body["conversation_history_size"], 0);
    }

    #[tokio::test]
    async fn models_are_proxied_from_the_runtime() {
        let upstream = Router::new().route(
            "/api/tags",
            get(|| async { Json(json!({"models": [{"name": "mistral:latest"}]})) }),
        );
        let app = app_with(spawn_upstream(upstream).await, Arc::new(Echo));

        let (status, body) = send(app, get_request("/models")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"models": [{"name": "mistral:latest"}]}));
    }

    #[tokio::test]
    async fn models_without_runtime_is_unavailable() {
        let (status, body) = send(app().await, get_request("/models")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "UPSTREAM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn conversation_endpoints_are_empty() {
        let (status, body) = send(app().await, get_request("/conversation")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conversation_history"], json!([]));
        assert_eq!(body["history_size"], 0);

        let delete = Request::builder()
            .method("DELETE")
            .uri("/conversation")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app().await, delete).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "No server-side conversation history to clear");
    }

    #[tokio::test]
    async fn reset_model_always_answers_ok() {
        let request = Request::builder()
            .method("POST")
            .uri("/reset-model")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app().await, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Error resetting model");
    }

    #[tokio::test]
    async fn root_describes_the_configuration() {
        let (status, body) = send(app().await, get_request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default_model"], "mistral");
        assert_eq!(body["ollama_host"], "127.0.0.1");
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/conversation")
            .header("origin", "app://desktop")
            .body(Body::empty())
            .unwrap();
        let response = app().await.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn metrics_are_exposed() {
        send(app().await, chat(r#"{"prompt": "count me"}"#)).await;

        let response = app().await.oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("chat_gateway_requests_total"));
    }
}
