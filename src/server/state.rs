//! Application state shared across HTTP handlers.

use crate::auth::CredentialStore;
use crate::config::{GatewayConfig, ModelsConfig};
use crate::core::ChatHandler;
use std::sync::Arc;

/// Shared resources handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub chat_handler: Arc<ChatHandler>,
    pub credential_store: Arc<CredentialStore>,
    pub models_config: Arc<ModelsConfig>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        chat_handler: ChatHandler,
        credential_store: CredentialStore,
        models_config: Arc<ModelsConfig>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            chat_handler: Arc::new(chat_handler),
            credential_store: Arc::new(credential_store),
            models_config,
        }
    }
}
