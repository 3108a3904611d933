//! An OpenAI-compatible adapter reachable over plain local HTTP.
//!
//! Identical wire shape to [`super::openai_compatible`]; kept as its own
//! variant because a local runtime (e.g. a same-host inference server) may
//! have no API key configured at all, which is not an error for this kind.

use super::openai_compatible::OpenAiCompatibleAdapter;
use super::UpstreamAdapter;
use crate::core::message::ChatMessage;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

pub struct LocalHttpAdapter {
    inner: OpenAiCompatibleAdapter,
}

impl LocalHttpAdapter {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            inner: OpenAiCompatibleAdapter::new(base_url, api_key, model),
        }
    }
}

#[async_trait]
impl UpstreamAdapter for LocalHttpAdapter {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<BoxStream<'static, Result<String>>> {
        self.inner.chat(messages).await
    }
}
