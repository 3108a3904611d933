//! Hides vendor-specific upstream wire shapes behind one trait
//! (spec.md §4.4, §9's "tagged union of adapter variants plus a factory").

mod google;
mod local_http;
mod openai_compatible;
mod sse;

use crate::config::{UpstreamKind, providers};
use crate::core::message::ChatMessage;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::Duration;

/// Default bound on the first-chunk read when an adapter has no timeout of
/// its own (spec.md §5).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One upstream attempt: given a conversation, yields a lazy sequence of
/// text fragments or fails.
#[async_trait]
pub trait UpstreamAdapter: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<BoxStream<'static, Result<String>>>;
}

/// Construct the adapter for `(provider_key, model)`. Synchronous: building
/// an adapter never touches the network, only configuration.
pub fn build(provider_key: &str, model: &str) -> Result<Box<dyn UpstreamAdapter>> {
    let descriptor = providers::find(provider_key)
        .ok_or_else(|| GatewayError::Internal(format!("unknown provider: {provider_key}")))?;
    let api_key = std::env::var(descriptor.api_key_env_name).ok();

    Ok(match descriptor.kind {
        UpstreamKind::OpenAiCompatible => Box::new(openai_compatible::OpenAiCompatibleAdapter::new(
            descriptor.base_url.to_string(),
            api_key,
            model.to_string(),
        )),
        UpstreamKind::Google => Box::new(google::GoogleAdapter::new(
            descriptor.base_url.to_string(),
            api_key,
            model.to_string(),
        )),
        UpstreamKind::LocalHttp => Box::new(local_http::LocalHttpAdapter::new(
            descriptor.base_url.to_string(),
            api_key,
            model.to_string(),
        )),
    })
}

/// The factory seam `core::dispatch` builds adapters through. The "tagged
/// union of adapter variants plus a factory function" from spec.md §9 is
/// [`build`]; this trait exists only so tests can swap it for a fake without
/// touching the network (`core::dispatch`'s tests use it directly).
pub trait AdapterFactory: Send + Sync {
    fn build(&self, provider_key: &str, model: &str) -> Result<Box<dyn UpstreamAdapter>>;
}

/// The production factory: delegates to [`build`].
pub struct LiveAdapterFactory;

impl AdapterFactory for LiveAdapterFactory {
    fn build(&self, provider_key: &str, model: &str) -> Result<Box<dyn UpstreamAdapter>> {
        build(provider_key, model)
    }
}
