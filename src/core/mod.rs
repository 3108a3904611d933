//! The dispatch core: message types, provider registry, upstream adapters,
//! the fallback algorithm, and wire-format translators.

pub mod dispatch;
pub mod message;
pub mod registry;
pub mod streaming;
pub mod upstream;

pub use dispatch::{ChatHandler, ChatResult};
pub use message::{ChatMessage, Role};
pub use registry::{ActiveProvider, ProviderRegistry};
