//! SSE line framing, shared by every OpenAI-shaped adapter.
//!
//! Adapted from the raw `bytes_stream` → `BoxStream<Result<String>>` pattern;
//! this variant additionally reassembles `data: ...\n\n` frames split across
//! network chunks and stops at the `[DONE]` sentinel.

use crate::utils::error::{GatewayError, Result};
use async_stream::stream;
use futures::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::Response;

/// Turn an upstream SSE response into a stream of raw `data:` payloads
/// (JSON text, pre-parse). Terminates on `[DONE]` or stream end.
pub fn data_payload_stream(response: Response) -> BoxStream<'static, Result<String>> {
    Box::pin(stream! {
        let mut body = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    yield Err(GatewayError::Http(e));
                    return;
                }
            };
            let Ok(text) = std::str::from_utf8(&chunk) else {
                continue;
            };
            buffer.push_str(text);

            while let Some(pos) = buffer.find("\n\n") {
                let frame: String = buffer.drain(..pos + 2).collect();
                for line in frame.lines() {
                    let Some(data) = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")) else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        return;
                    }
                    if data.is_empty() {
                        continue;
                    }
                    yield Ok(data.to_string());
                }
            }
        }
    })
}
