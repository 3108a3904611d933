//! HTTP server bootstrap: routes, CORS, and binding (spec.md §6.1).

use crate::auth::{AuthMiddleware, CredentialStore};
use crate::config::{GatewayConfig, ModelsConfig};
use crate::core::{ChatHandler, ProviderRegistry};
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::database::{self, ProviderSettingsStore};
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer as ActixHttpServer, web};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// Build application state, open the database, and serve until shut down.
pub async fn run(config: GatewayConfig) -> Result<()> {
    let db = database::connect(&config.database_url).await?;

    let credential_store = CredentialStore::new(db.clone());
    let settings_store = ProviderSettingsStore::new(db.clone());
    let models_config = Arc::new(ModelsConfig::new(config.models_config_path.clone()));
    let registry = ProviderRegistry::new(settings_store, models_config.clone());
    let chat_handler = ChatHandler::new(registry);

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = web::Data::new(AppState::new(
        config,
        chat_handler,
        credential_store,
        models_config,
    ));

    info!(
        build_time = env!("BUILD_TIME"),
        git_hash = env!("GIT_HASH"),
        "starting aicarousel-gateway on {bind_addr}"
    );

    ActixHttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                "Content-Type",
                "Authorization",
                "x-api-key",
                "anthropic-version",
                "anthropic-beta",
            ])
            .max_age(3600);

        let auth = AuthMiddleware::new(state.credential_store.clone());

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(TracingLogger::default())
            .wrap(auth)
            .configure(routes::configure)
    })
    .bind(&bind_addr)
    .map_err(|e| GatewayError::Config(format!("failed to bind {bind_addr}: {e}")))?
    .run()
    .await
    .map_err(|e| GatewayError::Internal(format!("server error: {e}")))?;

    Ok(())
}
