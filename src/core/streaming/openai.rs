//! Internal chunk stream → OpenAI wire format (spec.md §4.5.1).

use super::util::{estimate_tokens, random_hex, unix_now};
use crate::core::dispatch::ChatResult;
use actix_web::web::Bytes;
use async_stream::stream;
use futures_util::StreamExt;
use serde_json::json;

fn chunk_id() -> String {
    format!("chatcmpl-{}", random_hex(24))
}

fn sse_frame(value: &serde_json::Value) -> Bytes {
    Bytes::from(format!("data: {value}\n\n"))
}

/// Stream SSE frames for `/v1/chat/completions` with `stream: true`
/// (spec.md §4.5.1, scenario S1).
pub fn sse_stream(
    result: ChatResult,
) -> futures::stream::BoxStream<'static, std::result::Result<Bytes, actix_web::Error>> {
    let id = chunk_id();
    let created = unix_now();
    let model = result.model.clone();

    Box::pin(stream! {
        let mut upstream = result.stream;
        let mut is_first = true;

        loop {
            match upstream.next().await {
                Some(Ok(content)) => {
                    let delta = if is_first {
                        is_first = false;
                        json!({"role": "assistant", "content": content})
                    } else {
                        json!({"content": content})
                    };
                    let frame = json!({
                        "id": id,
                        "object": "chat.completion.chunk",
                        "created": created,
                        "model": model,
                        "choices": [{"index": 0, "delta": delta, "finish_reason": null}],
                    });
                    yield Ok(sse_frame(&frame));
                }
                Some(Err(_)) => break,
                None => break,
            }
        }

        let final_frame = json!({
            "id": id,
            "object": "chat.completion.chunk",
            "created": created,
            "model": model,
            "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}],
        });
        yield Ok(sse_frame(&final_frame));
        yield Ok(Bytes::from_static(b"data: [DONE]\n\n"));
    })
}

/// Collect the full stream and build a non-streaming completion object
/// (spec.md §4.5.1).
pub async fn collect(result: ChatResult) -> crate::utils::error::Result<serde_json::Value> {
    let mut upstream = result.stream;
    let mut content = String::new();
    while let Some(item) = upstream.next().await {
        content.push_str(&item?);
    }

    let completion_tokens = estimate_tokens(&content);
    Ok(json!({
        "id": chunk_id(),
        "object": "chat.completion",
        "created": unix_now(),
        "model": result.model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop",
        }],
        "usage": {
            "prompt_tokens": 0,
            "completion_tokens": completion_tokens,
            "total_tokens": completion_tokens,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ids_are_prefixed_and_24_hex_chars() {
        let id = chunk_id();
        let suffix = id.strip_prefix("chatcmpl-").unwrap();
        assert_eq!(suffix.len(), 24);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
