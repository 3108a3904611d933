//! The OpenAI-compatible chat-completions adapter, covering most providers.

use super::sse::data_payload_stream;
use super::{DEFAULT_TIMEOUT, UpstreamAdapter};
use crate::core::message::{ChatMessage, Role};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures_util::StreamExt;
use serde_json::{Value, json};

fn role_str(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn extract_delta(data: &str) -> Result<String> {
    let value: Value = serde_json::from_str(data).map_err(GatewayError::Serialization)?;
    Ok(value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string())
}

pub struct OpenAiCompatibleAdapter {
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatibleAdapter {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl UpstreamAdapter for OpenAiCompatibleAdapter {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<BoxStream<'static, Result<String>>> {
        let body = json!({
            "model": self.model,
            "stream": true,
            "messages": messages.iter().map(|m| json!({
                "role": role_str(m.role),
                "content": m.content,
            })).collect::<Vec<_>>(),
        });

        let client = reqwest::Client::new();
        let mut request = client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(DEFAULT_TIMEOUT)
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(GatewayError::Http)?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Internal(format!(
                "upstream returned {status}: {text}"
            )));
        }

        let stream = data_payload_stream(response).map(|item| item.and_then(|data| extract_delta(&data)));
        Ok(Box::pin(stream))
    }
}
