//! aicarousel-gateway - multi-upstream AI chat gateway
//!
//! Authenticates callers, dispatches chat requests across configured
//! upstream providers with round-robin fairness and fallback, and streams
//! the response back in the client's chosen wire format (OpenAI or
//! Anthropic).

use aicarousel_gateway::{config::GatewayConfig, server, utils::logging};
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("gateway exited with error: {}", e);
            ExitCode::FAILURE
        }
    }
}
