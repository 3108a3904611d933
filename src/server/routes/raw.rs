//! `POST /chat`: the unframed raw chunk stream (spec.md §6.1).

use crate::core::message::ChatMessage;
use crate::server::routes::errors;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result, WireFormat};
use actix_web::{HttpResponse, Result as ActixResult, web};
use futures_util::StreamExt;
use serde_json::Value;

fn parse_messages(body: &[Value]) -> Result<Vec<ChatMessage>> {
    body.iter()
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

pub async fn chat(state: web::Data<AppState>, body: web::Json<Vec<Value>>) -> ActixResult<HttpResponse> {
    let messages = match parse_messages(&body) {
        Ok(m) => m,
        Err(e) => return Ok(errors::gateway_error_to_response(e, WireFormat::OpenAi)),
    };

    match state.chat_handler.dispatch(&messages).await {
        Ok(result) => {
            let stream = result.stream.map(|item| {
                item.map(actix_web::web::Bytes::from)
                    .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))
            });
            Ok(HttpResponse::Ok()
                .content_type("text/event-stream")
                .streaming(stream))
        }
        Err(e) => Ok(errors::gateway_error_to_response(e, WireFormat::OpenAi)),
    }
}
