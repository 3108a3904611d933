//! The internal lazy chunk stream type and the first-chunk-peek-then-prepend
//! wrapper (spec.md §9).
//!
//! The handler must consume the first item from an upstream to validate it,
//! but the caller must still see a stream that begins with that item. This
//! module owns that one piece of plumbing so `core::dispatch` stays about
//! the fallback algorithm rather than stream mechanics.

use crate::utils::error::Result;
use futures::stream::{self, BoxStream, StreamExt};

/// A lazy, single-pass sequence of text fragments from an upstream adapter,
/// or the internal stream handed onward to a wire-format translator.
pub type ChunkStream = BoxStream<'static, Result<String>>;

/// Pull the first item off `stream`. Returns `None` if the stream ended
/// before producing one (spec.md §4.3: an empty response is a failure).
pub async fn take_first(stream: &mut ChunkStream) -> Option<Result<String>> {
    stream.next().await
}

/// Rebuild a stream that yields `first` and then delegates to the remainder
/// of `rest`, without re-starting the upstream (spec.md §9).
pub fn prepend(first: String, rest: ChunkStream) -> ChunkStream {
    Box::pin(stream::once(async move { Ok(first) }).chain(rest))
}
