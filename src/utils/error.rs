//! Error handling for the gateway
//!
//! Defines the single error type used throughout the gateway and maps each
//! variant to an HTTP status code and a format-matching JSON body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Which wire format an error body should be rendered in.
///
/// Anthropic-style bodies are used for any `/v1/messages*` path; every other
/// path uses OpenAI-style bodies (spec.md §4.6, §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    OpenAi,
    Anthropic,
}

/// Main error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Malformed request body, missing required field.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or invalid API key.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// No active providers were found when dispatching.
    #[error("No AI providers configured")]
    NoProviders,

    /// Every provider/model attempt failed.
    #[error("{0}")]
    AllFailed(String),

    /// Unexpected error above the dispatch core.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database errors.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Upstream HTTP transport errors.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `ModelsConfig` validation/constraint violations (spec.md §4.2).
    #[error("Config error: {0}")]
    ModelsConfig(String),
}

impl GatewayError {
    /// The message shown to the caller. Spec §7 only allows `all_failed`
    /// to leak upstream detail; every other 500-class error is rendered as
    /// the fixed string `"Internal server error"` with no inner detail.
    fn client_message(&self) -> String {
        match self {
            GatewayError::Internal(_)
            | GatewayError::Database(_)
            | GatewayError::Http(_)
            | GatewayError::Serialization(_)
            | GatewayError::Io(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Render this error as a JSON body in the requested wire format.
    pub fn to_body(&self, format: WireFormat) -> serde_json::Value {
        let message = self.client_message();
        match format {
            WireFormat::OpenAi => json!({
                "error": {
                    "message": message,
                    "type": self.openai_type(),
                    "param": serde_json::Value::Null,
                    "code": self.openai_code(),
                }
            }),
            WireFormat::Anthropic => json!({
                "type": "error",
                "error": {
                    "type": self.anthropic_type(),
                    "message": message,
                }
            }),
        }
    }

    fn openai_type(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::ModelsConfig(_) => {
                "invalid_request_error"
            }
            GatewayError::Authentication(_) => "invalid_request_error",
            GatewayError::NoProviders | GatewayError::AllFailed(_) => "api_error",
            _ => "internal_error",
        }
    }

    fn openai_code(&self) -> Option<&'static str> {
        match self {
            GatewayError::Authentication(_) => Some("invalid_api_key"),
            _ => None,
        }
    }

    fn anthropic_type(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::ModelsConfig(_) => {
                "invalid_request_error"
            }
            GatewayError::Authentication(_) => "authentication_error",
            GatewayError::NoProviders | GatewayError::AllFailed(_) => "api_error",
            _ => "internal_server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::ModelsConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Authentication(_) => StatusCode::UNAUTHORIZED,
            GatewayError::NoProviders | GatewayError::AllFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        GatewayError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        // Handlers that know the caller's wire format render the body
        // themselves (see `server::routes::errors`); this default fallback
        // covers errors surfaced outside a route handler (e.g. extractor
        // failures) and always renders OpenAI-style.
        HttpResponse::build(self.status_code()).json(self.to_body(WireFormat::OpenAi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_is_400() {
        let err = GatewayError::InvalidRequest("missing messages".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn authentication_is_401() {
        let err = GatewayError::Authentication("Missing API key".into());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn no_providers_and_all_failed_are_503() {
        assert_eq!(
            GatewayError::NoProviders.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GatewayError::AllFailed("boom".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn openai_auth_body_shape() {
        let err = GatewayError::Authentication("Missing API key".into());
        let body = err.to_body(WireFormat::OpenAi);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["code"], "invalid_api_key");
    }

    #[test]
    fn anthropic_auth_body_shape() {
        let err = GatewayError::Authentication("Missing API key".into());
        let body = err.to_body(WireFormat::Anthropic);
        assert_eq!(body["type"], "error");
        assert_eq!(body["error"]["type"], "authentication_error");
    }

    #[test]
    fn internal_errors_never_leak_their_detail_to_the_client() {
        let err = GatewayError::Internal("database pool exhausted at 10.0.0.4".into());
        let body = err.to_body(WireFormat::OpenAi);
        assert_eq!(body["error"]["message"], "Internal server error");

        let body = err.to_body(WireFormat::Anthropic);
        assert_eq!(body["error"]["message"], "Internal server error");
    }

    #[test]
    fn all_failed_still_surfaces_the_last_upstream_message() {
        let err = GatewayError::AllFailed("upstream timed out".into());
        let body = err.to_body(WireFormat::OpenAi);
        assert_eq!(body["error"]["message"], "upstream timed out");
    }
}
