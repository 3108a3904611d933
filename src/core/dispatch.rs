//! The dispatch core (spec.md §4.3): round-robin provider selection,
//! per-provider model fallback, cross-provider failover, first-chunk
//! validation.

use crate::core::message::ChatMessage;
use crate::core::registry::{ActiveProvider, ProviderRegistry};
use crate::core::streaming::chunk::{self, ChunkStream};
use crate::core::upstream::{self, AdapterFactory, LiveAdapterFactory};
use crate::utils::error::{GatewayError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The validated result of a successful dispatch (spec.md §3).
pub struct ChatResult {
    /// Guaranteed to begin with the first chunk observed from the upstream.
    pub stream: ChunkStream,
    pub service_name: String,
    pub model: String,
    pub provider_key: String,
}

/// Owns the process-wide round-robin counter and runs the fallback
/// algorithm against a fresh `ProviderRegistry` view on every call.
pub struct ChatHandler {
    registry: ProviderRegistry,
    next_index: AtomicUsize,
    factory: Box<dyn AdapterFactory>,
}

impl ChatHandler {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            next_index: AtomicUsize::new(0),
            factory: Box::new(LiveAdapterFactory),
        }
    }

    /// Run the full dispatch algorithm for one request.
    pub async fn dispatch(&self, messages: &[ChatMessage]) -> Result<ChatResult> {
        let actives = self.registry.list_active().await?;
        run_dispatch(&actives, &self.next_index, self.factory.as_ref(), messages).await
    }
}

/// The round-robin + fallback loop itself, independent of where the active
/// set and the counter come from. Separated out so it can be exercised
/// directly against a fake `AdapterFactory` in tests, without a database or
/// network (spec.md §4.3, §8).
async fn run_dispatch(
    actives: &[ActiveProvider],
    next_index: &AtomicUsize,
    factory: &dyn AdapterFactory,
    messages: &[ChatMessage],
) -> Result<ChatResult> {
    if actives.is_empty() {
        return Err(GatewayError::NoProviders);
    }

    let count = actives.len();
    let start = next_index.load(Ordering::Relaxed) % count;

    let mut last_err: Option<String> = None;
    for i in 0..count {
        let provider = &actives[(start + i) % count];
        match try_provider(provider, factory, messages).await {
            Ok(result) => {
                next_index.store((start + i + 1) % count, Ordering::Relaxed);
                return Ok(result);
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(GatewayError::AllFailed(
        last_err.unwrap_or_else(|| "every provider failed".to_string()),
    ))
}

/// Try every model of one provider, in fallback order, stopping at the
/// first success. Returns the message of the last observed failure if all
/// fail (or if fallback is disabled and the only attempt fails).
async fn try_provider(
    provider: &ActiveProvider,
    factory: &dyn AdapterFactory,
    messages: &[ChatMessage],
) -> std::result::Result<ChatResult, String> {
    let models: Vec<&str> = if provider.enable_fallback {
        std::iter::once(provider.default_model.as_str())
            .chain(
                provider
                    .models
                    .iter()
                    .map(String::as_str)
                    .filter(|m| *m != provider.default_model),
            )
            .collect()
    } else {
        vec![provider.default_model.as_str()]
    };

    let mut last_err = "no models configured".to_string();
    for model in models {
        let adapter = match factory.build(&provider.key, model) {
            Ok(adapter) => adapter,
            Err(e) => {
                last_err = e.to_string();
                if !provider.enable_fallback {
                    break;
                }
                continue;
            }
        };

        match try_model(adapter.as_ref(), provider, model, messages).await {
            Ok(result) => return Ok(result),
            Err(e) => {
                last_err = e;
                if !provider.enable_fallback {
                    break;
                }
            }
        }
    }

    Err(last_err)
}

/// First-chunk validation: consume the first item from the adapter's
/// stream; only return success (and only then expose a stream to the
/// caller) once that item has been observed.
async fn try_model(
    adapter: &dyn upstream::UpstreamAdapter,
    provider: &ActiveProvider,
    model: &str,
    messages: &[ChatMessage],
) -> std::result::Result<ChatResult, String> {
    let mut raw_stream = adapter.chat(messages).await.map_err(|e| e.to_string())?;

    let first = match chunk::take_first(&mut raw_stream).await {
        None => return Err("upstream produced an empty stream".to_string()),
        Some(Err(e)) => return Err(e.to_string()),
        Some(Ok(value)) => value,
    };

    Ok(ChatResult {
        stream: chunk::prepend(first, raw_stream),
        service_name: provider.name.clone(),
        model: model.to_string(),
        provider_key: provider.key.clone(),
    })
}
