//! Environment-driven gateway configuration.

pub mod models_config;
pub mod providers;

pub use models_config::{ModelsConfig, ModelsSnapshot, ProviderModelConfig};
pub use providers::{KNOWN_PROVIDERS, ProviderDescriptor, UpstreamKind};

use crate::utils::error::{GatewayError, Result};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 7123;

/// Process configuration, assembled once at boot from the environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub models_config_path: PathBuf,
}

impl GatewayConfig {
    /// Load configuration from the process environment, parsing a `.env`
    /// file at the repo root first if one is present.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !matches!(e, dotenvy::Error::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound)
            {
                return Err(GatewayError::Config(format!("failed to load .env: {e}")));
            }
        }

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| GatewayError::Config(format!("PORT is not a valid port: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://aicarousel.db?mode=rwc".to_string());

        let models_config_path = std::env::var("MODELS_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models.json"));

        let config = Self {
            host,
            port,
            database_url,
            models_config_path,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(GatewayError::Config("PORT must be nonzero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_port() {
        let config = GatewayConfig {
            host: "0.0.0.0".to_string(),
            port: 0,
            database_url: "sqlite://test.db".to_string(),
            models_config_path: PathBuf::from("models.json"),
        };
        assert!(config.validate().is_err());
    }
}
