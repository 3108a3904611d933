//! # aicarousel-gateway
//!
//! A multi-upstream AI chat gateway. Clients send chat completion requests
//! in either an OpenAI-style or Anthropic-style wire format; the gateway
//! authenticates the caller, selects one of several configured upstream LLM
//! providers, streams the upstream's response back to the client in the
//! client's chosen format, and transparently fails over to another provider
//! (or an alternate model at the same provider) when an attempt fails.
//!
//! The value of this crate is not any single upstream adapter but the
//! dispatch core in [`core::dispatch`]: provider selection and round-robin
//! advancement, per-provider model fallback, cross-provider fallback with
//! first-chunk validation, and streaming translation between wire formats
//! without buffering.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::GatewayConfig;
pub use utils::error::{GatewayError, Result};

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
