//! Anthropic-shaped endpoints: `/v1/messages`, `/v1/messages/count_tokens`
//! (spec.md §6.1).

use crate::core::streaming::{anthropic, estimate_tokens_for_len};
use crate::server::routes::errors;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result, WireFormat};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde_json::{Value, json};

/// `max_tokens` is required for protocol conformance but never propagated
/// to the upstream (spec.md §4.5.3).
fn require_max_tokens(body: &Value) -> Result<()> {
    if body.get("max_tokens").and_then(Value::as_u64).is_none() {
        return Err(GatewayError::InvalidRequest(
            "max_tokens is required".into(),
        ));
    }
    Ok(())
}

pub async fn messages(state: web::Data<AppState>, body: web::Json<Value>) -> ActixResult<HttpResponse> {
    let body = body.into_inner();

    if let Err(e) = require_max_tokens(&body) {
        return Ok(errors::gateway_error_to_response(e, WireFormat::Anthropic));
    }

    let raw_messages = match body.get("messages").and_then(Value::as_array) {
        Some(m) => m.clone(),
        None => {
            return Ok(errors::gateway_error_to_response(
                GatewayError::InvalidRequest("messages is required".into()),
                WireFormat::Anthropic,
            ));
        }
    };

    let messages = match anthropic::normalize_messages(body.get("system"), &raw_messages) {
        Ok(m) => m,
        Err(e) => return Ok(errors::gateway_error_to_response(e, WireFormat::Anthropic)),
    };

    let stream_requested = body.get("stream").and_then(Value::as_bool).unwrap_or(false);

    match state.chat_handler.dispatch(&messages).await {
        Ok(result) => {
            if stream_requested {
                Ok(HttpResponse::Ok()
                    .content_type("text/event-stream")
                    .streaming(anthropic::sse_stream(result)))
            } else {
                match anthropic::collect(result).await {
                    Ok(body) => Ok(HttpResponse::Ok().json(body)),
                    Err(e) => Ok(errors::gateway_error_to_response(e, WireFormat::Anthropic)),
                }
            }
        }
        Err(e) => Ok(errors::gateway_error_to_response(e, WireFormat::Anthropic)),
    }
}

pub async fn count_tokens(body: web::Json<Value>) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    let raw_messages = body.get("messages").and_then(Value::as_array).cloned().unwrap_or_default();

    let messages = match anthropic::normalize_messages(body.get("system"), &raw_messages) {
        Ok(m) => m,
        Err(e) => return Ok(errors::gateway_error_to_response(e, WireFormat::Anthropic)),
    };

    let total_chars: usize = messages.iter().map(|m| m.content.chars().count()).sum();
    let input_tokens = estimate_tokens_for_len(total_chars);
    Ok(HttpResponse::Ok().json(json!({"input_tokens": input_tokens})))
}
