//! OpenAI-shaped endpoints: `/v1/chat/completions`, `/v1/models`,
//! `/v1/models/{id}` (spec.md §6.1).

use crate::core::message::ChatMessage;
use crate::core::streaming::openai;
use crate::server::routes::errors;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result, WireFormat};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde_json::{Value, json};

/// Model ids the gateway advertises. Routing is not model-sensitive — the
/// model actually dispatched to comes from `ModelsConfig`, not this field
/// (spec.md §9).
const ADVERTISED_MODELS: &[&str] = &["aicarousel", "gpt-4", "gpt-3.5-turbo", "claude-3-5-sonnet-20241022"];

fn parse_messages(body: &Value) -> Result<Vec<ChatMessage>> {
    let raw = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::InvalidRequest("messages is required".into()))?;

    raw.iter()
        .map(|entry| {
            let role = entry
                .get("role")
                .and_then(Value::as_str)
                .ok_or_else(|| GatewayError::InvalidRequest("message missing role".into()))?;
            let content = entry
                .get("content")
                .and_then(Value::as_str)
                .ok_or_else(|| GatewayError::InvalidRequest("message missing content".into()))?;
            Ok(match role {
                "system" => ChatMessage::system(content),
                "assistant" => ChatMessage::assistant(content),
                _ => ChatMessage::user(content),
            })
        })
        .collect()
}

pub async fn chat_completions(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();

    let messages = match parse_messages(&body) {
        Ok(m) => m,
        Err(e) => return Ok(errors::gateway_error_to_response(e, WireFormat::OpenAi)),
    };

    let stream_requested = body.get("stream").and_then(Value::as_bool).unwrap_or(false);

    match state.chat_handler.dispatch(&messages).await {
        Ok(result) => {
            if stream_requested {
                Ok(HttpResponse::Ok()
                    .content_type("text/event-stream")
                    .streaming(openai::sse_stream(result)))
            } else {
                match openai::collect(result).await {
                    Ok(body) => Ok(HttpResponse::Ok().json(body)),
                    Err(e) => Ok(errors::gateway_error_to_response(e, WireFormat::OpenAi)),
                }
            }
        }
        Err(e) => Ok(errors::gateway_error_to_response(e, WireFormat::OpenAi)),
    }
}

pub async fn list_models() -> ActixResult<HttpResponse> {
    let data: Vec<Value> = ADVERTISED_MODELS
        .iter()
        .map(|id| json!({"id": id, "object": "model", "owned_by": "aicarousel"}))
        .collect();
    Ok(HttpResponse::Ok().json(json!({"object": "list", "data": data})))
}

pub async fn get_model(path: web::Path<String>) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    Ok(HttpResponse::Ok().json(json!({"id": id, "object": "model", "owned_by": "aicarousel"})))
}
