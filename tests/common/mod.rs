//! Shared harness for the integration tests: a migrated in-memory database
//! and a temp-file-backed models config, wired into a real `AppState` the
//! same way `server::http::run` does.

use aicarousel_gateway::auth::CredentialStore;
use aicarousel_gateway::config::{GatewayConfig, ModelsConfig};
use aicarousel_gateway::core::{ChatHandler, ProviderRegistry};
use aicarousel_gateway::server::state::AppState;
use aicarousel_gateway::storage::database::{self, ProviderSettingsStore};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A running test harness: keeps the temp models-config file alive for the
/// duration of the test and exposes the `AppState` it was built from.
pub struct Harness {
    pub state: actix_web::web::Data<AppState>,
    _models_file: NamedTempFile,
}

/// A models document with one provider that will never be active (no
/// corresponding API key is set in the test process), so dispatch always
/// fails with "no providers" rather than making a network call.
fn inert_models_json() -> &'static str {
    r#"{"cerebras": {"default": "m1", "enableFallback": true, "models": ["m1"]}}"#
}

pub async fn harness() -> Harness {
    let db = database::connect("sqlite::memory:").await.unwrap();

    let models_file = NamedTempFile::new().unwrap();
    std::fs::write(models_file.path(), inert_models_json()).unwrap();

    let credential_store = CredentialStore::new(db.clone());
    let settings_store = ProviderSettingsStore::new(db.clone());
    let models_config = std::sync::Arc::new(ModelsConfig::new(models_file.path().to_path_buf()));
    let registry = ProviderRegistry::new(settings_store, models_config.clone());
    let chat_handler = ChatHandler::new(registry);

    let config = GatewayConfig {
        host: "127.0.0.1".to_string(),
        port: 7123,
        database_url: "sqlite::memory:".to_string(),
        models_config_path: PathBuf::from(models_file.path()),
    };

    let state = actix_web::web::Data::new(AppState::new(
        config,
        chat_handler,
        credential_store,
        models_config,
    ));

    Harness {
        state,
        _models_file: models_file,
    }
}

/// Build the same middleware/route stack `server::http::run` serves,
/// without binding a socket.
#[macro_export]
macro_rules! test_app {
    ($harness:expr) => {
        actix_web::App::new()
            .app_data($harness.state.clone())
            .wrap(aicarousel_gateway::auth::AuthMiddleware::new(
                $harness.state.credential_store.clone(),
            ))
            .configure(aicarousel_gateway::server::routes::configure)
    };
}

/// Issue a fresh API key against the harness's credential store and return
/// its plaintext.
pub async fn issue_key(harness: &Harness) -> String {
    let (plaintext, _) = harness.state.credential_store.create(None).await.unwrap();
    plaintext
}
