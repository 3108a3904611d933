//! Internal chunk stream → Anthropic wire format (spec.md §4.5.2).

use super::util::{estimate_tokens, random_hex};
use crate::core::dispatch::ChatResult;
use crate::core::message::ChatMessage;
use crate::utils::error::{GatewayError, Result};
use actix_web::web::Bytes;
use async_stream::stream;
use futures_util::StreamExt;
use serde_json::{Value, json};

fn message_id() -> String {
    format!("msg_{}", random_hex(24))
}

fn event_frame(event: &str, data: &serde_json::Value) -> Bytes {
    Bytes::from(format!("event: {event}\ndata: {data}\n\n"))
}

/// Stream the fixed Anthropic event sequence (spec.md §4.5.2).
pub fn sse_stream(
    result: ChatResult,
) -> futures::stream::BoxStream<'static, std::result::Result<Bytes, actix_web::Error>> {
    let id = message_id();
    let model = result.model.clone();

    Box::pin(stream! {
        yield Ok(event_frame("message_start", &json!({
            "type": "message_start",
            "message": {
                "id": id,
                "type": "message",
                "role": "assistant",
                "model": model,
                "content": [],
                "stop_reason": null,
                "stop_sequence": null,
                "usage": {"input_tokens": 0, "output_tokens": 0},
            },
        })));

        yield Ok(event_frame("content_block_start", &json!({
            "type": "content_block_start",
            "index": 0,
            "content_block": {"type": "text", "text": ""},
        })));

        let mut upstream = result.stream;
        let mut output_tokens: u64 = 0;

        loop {
            match upstream.next().await {
                Some(Ok(chunk)) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    output_tokens += estimate_tokens(&chunk);
                    yield Ok(event_frame("content_block_delta", &json!({
                        "type": "content_block_delta",
                        "index": 0,
                        "delta": {"type": "text_delta", "text": chunk},
                    })));
                }
                Some(Err(_)) => break,
                None => break,
            }
        }

        yield Ok(event_frame("content_block_stop", &json!({
            "type": "content_block_stop",
            "index": 0,
        })));

        yield Ok(event_frame("message_delta", &json!({
            "type": "message_delta",
            "delta": {"stop_reason": "end_turn", "stop_sequence": null},
            "usage": {"output_tokens": output_tokens},
        })));

        yield Ok(event_frame("message_stop", &json!({"type": "message_stop"})));
    })
}

/// Collect the full stream and build a non-streaming `Message` object
/// (spec.md §4.5.2, scenario S5).
pub async fn collect(result: ChatResult) -> crate::utils::error::Result<serde_json::Value> {
    let mut upstream = result.stream;
    let mut content = String::new();
    while let Some(item) = upstream.next().await {
        content.push_str(&item?);
    }

    let output_tokens = estimate_tokens(&content);
    Ok(json!({
        "id": message_id(),
        "type": "message",
        "role": "assistant",
        "model": result.model,
        "content": [{"type": "text", "text": content}],
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {"input_tokens": 0, "output_tokens": output_tokens},
    }))
}

/// Normalize an Anthropic request's `content` field (plain string or a list
/// of content blocks) into a single string: only `type: "text"` blocks are
/// kept, joined with `"\n"` (spec.md §4.5.3).
pub fn normalize_content(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

/// Build the internal message list from an Anthropic request body: the
/// top-level `system` field (if present) becomes a leading `system`
/// message, and each entry of `messages` is normalized in place.
pub fn normalize_messages(system: Option<&Value>, messages: &[Value]) -> Result<Vec<ChatMessage>> {
    let mut result = Vec::with_capacity(messages.len() + 1);

    if let Some(system) = system {
        let text = normalize_content(system);
        if !text.is_empty() {
            result.push(ChatMessage::system(text));
        }
    }

    for entry in messages {
        let role = entry
            .get("role")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::InvalidRequest("message missing role".into()))?;
        let content = entry
            .get("content")
            .ok_or_else(|| GatewayError::InvalidRequest("message missing content".into()))?;
        let text = normalize_content(content);
        result.push(match role {
            "assistant" => ChatMessage::assistant(text),
            _ => ChatMessage::user(text),
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids_are_prefixed_and_24_hex_chars() {
        let id = message_id();
        let suffix = id.strip_prefix("msg_").unwrap();
        assert_eq!(suffix.len(), 24);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn normalize_content_keeps_only_text_blocks() {
        let content = json!([
            {"type": "text", "text": "hello"},
            {"type": "image", "source": "ignored"},
            {"type": "text", "text": "world"},
        ]);
        assert_eq!(normalize_content(&content), "hello\nworld");
    }

    #[test]
    fn normalize_content_passes_plain_strings_through() {
        assert_eq!(normalize_content(&json!("hi")), "hi");
    }

    #[test]
    fn normalize_messages_prepends_system() {
        let messages = vec![json!({"role": "user", "content": "hi"})];
        let result = normalize_messages(Some(&json!("be nice")), &messages).unwrap();
        assert_eq!(result.len(), 2);
        assert!(matches!(result[0].role, crate::core::message::Role::System));
        assert_eq!(result[0].content, "be nice");
        assert_eq!(result[1].content, "hi");
    }
}
