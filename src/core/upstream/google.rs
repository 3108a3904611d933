//! The Google-style adapter: system prompt and turns are separate wire
//! fields rather than just another message in the list.

use super::sse::data_payload_stream;
use super::{DEFAULT_TIMEOUT, UpstreamAdapter};
use crate::core::message::{ChatMessage, Role};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures_util::StreamExt;
use serde_json::{Value, json};

fn turn_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::System | Role::User => "user",
    }
}

fn extract_delta(data: &str) -> Result<String> {
    let value: Value = serde_json::from_str(data).map_err(GatewayError::Serialization)?;
    Ok(value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string())
}

pub struct GoogleAdapter {
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GoogleAdapter {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl UpstreamAdapter for GoogleAdapter {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<BoxStream<'static, Result<String>>> {
        let system_instruction: Option<String> = {
            let parts: Vec<&str> = messages
                .iter()
                .filter(|m| m.role == Role::System)
                .map(|m| m.content.as_str())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("\n"))
            }
        };

        let contents: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                json!({
                    "role": turn_role(m.role),
                    "parts": [{"text": m.content}],
                })
            })
            .collect();

        let mut body = json!({ "contents": contents });
        if let Some(system) = system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        let api_key = self.api_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, api_key
        );

        let client = reqwest::Client::new();
        let response = client
            .post(url)
            .timeout(DEFAULT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(GatewayError::Http)?;

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
