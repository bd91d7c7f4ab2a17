use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Every failure a chat request can end in. Nothing is retried; each variant
/// is surfaced to the caller as a status code plus message.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Client-supplied data is malformed (empty prompt, bad JSON).
    #[error("{0}")]
    InvalidInput(String),

    /// The hosted model was selected without an API key.
    #[error("Claude API key required for Claude model")]
    MissingCredential,

    #[error("Invalid Claude API key")]
    AuthError,

    #[error("Claude API rate limit exceeded")]
    RateLimited,

    /// The local runtime could not be reached at all.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Upstream answered with a failure status or an error payload.
    #[error("{0}")]
    UpstreamError(String),

    /// Upstream answered 2xx but with a body we cannot use.
    #[error("{0}")]
    ProtocolError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) | GatewayError::MissingCredential => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::AuthError => StatusCode::UNAUTHORIZED,
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::UpstreamError(_) | GatewayError::ProtocolError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::InvalidInput(_) => "INVALID_INPUT",
            GatewayError::MissingCredential => "MISSING_CREDENTIAL",
            GatewayError::AuthError => "AUTH_ERROR",
            GatewayError::RateLimited => "RATE_LIMITED",
            GatewayError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            GatewayError::UpstreamError(_) => "UPSTREAM_ERROR",
            GatewayError::ProtocolError(_) => "PROTOCOL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

// `detail` is the field existing clients read the message from
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(err: JsonRejection) -> Self {
        GatewayError::InvalidInput(err.body_text())
    }
}
