//! Computes, per request, which providers are eligible to serve it
//! (spec.md §4.1).

use crate::config::{KNOWN_PROVIDERS, ModelsConfig, ModelsSnapshot, ProviderDescriptor};
use crate::storage::database::{ProviderSetting, ProviderSettingsStore};
use crate::utils::error::Result;
use std::sync::Arc;

/// A provider eligible to serve the current request. Never cached across
/// requests — enable flags, priority, and models may change without
/// restart.
#[derive(Debug, Clone)]
pub struct ActiveProvider {
    pub key: String,
    pub name: String,
    pub models: Vec<String>,
    pub default_model: String,
    pub enable_fallback: bool,
    pub priority: i32,
}

/// Produces the ordered list of `ActiveProvider`s for `ChatHandler`.
pub struct ProviderRegistry {
    settings: ProviderSettingsStore,
    models_config: Arc<ModelsConfig>,
}

impl ProviderRegistry {
    pub fn new(settings: ProviderSettingsStore, models_config: Arc<ModelsConfig>) -> Self {
        Self {
            settings,
            models_config,
        }
    }

    /// Fresh view of which providers may serve a request right now.
    pub async fn list_active(&self) -> Result<Vec<ActiveProvider>> {
        let settings = self.settings.list_all().await?;
        let models_snapshot = self.models_config.read()?;
        Ok(select_active(
            KNOWN_PROVIDERS,
            |name| std::env::var(name).ok(),
            &settings,
            &models_snapshot,
        ))
    }
}

/// The eligibility/sort algorithm itself (spec.md §4.1), pulled out of
/// `list_active` so it can be exercised directly against synthetic
/// descriptors, settings, and an injected env lookup instead of the real
/// process environment and database.
fn select_active(
    descriptors: &[ProviderDescriptor],
    env_lookup: impl Fn(&str) -> Option<String>,
    settings: &[ProviderSetting],
    models_snapshot: &ModelsSnapshot,
) -> Vec<ActiveProvider> {
    let mut actives = Vec::new();
    for descriptor in descriptors {
        let has_key = env_lookup(descriptor.api_key_env_name)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        if !has_key {
            continue;
        }

        let Some(model_config) = models_snapshot.get(descriptor.key) else {
            continue;
        };
        if model_config.models.is_empty() {
            continue;
        }

        let setting = settings.iter().find(|s| s.provider_key == descriptor.key);
        // No setting row anywhere, or none for this provider specifically:
        // treated as enabled, sorting after every provider that has one.
        let (is_enabled, priority) = match setting {
            Some(s) => (s.is_enabled, s.priority),
            None => (true, i32::MAX),
        };
        if !is_enabled {
            continue;
        }

        actives.push((
            priority,
            ActiveProvider {
                key: descriptor.key.to_string(),
                name: descriptor.name.to_string(),
                models: model_config.models.clone(),
                default_model: model_config.default.clone(),
                enable_fallback: model_config.enable_fallback,
                priority,
            },
        ));
    }

    actives.sort_by_key(|(priority, _)| *priority);
    actives.into_iter().map(|(_, active)| active).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderModelConfig, UpstreamKind};

    const DESCRIPTORS: &[ProviderDescriptor] = &[
        ProviderDescriptor {
            key: "alpha",
            name: "Alpha",
            api_key_env_name: "ALPHA_API_KEY",
            base_url: "https://alpha.example/v1",
            kind: UpstreamKind::OpenAiCompatible,
        },
        ProviderDescriptor {
            key: "beta",
            name: "Beta",
            api_key_env_name: "BETA_API_KEY",
            base_url: "https://beta.example/v1",
            kind: UpstreamKind::OpenAiCompatible,
        },
        ProviderDescriptor {
            key: "gamma",
            name: "Gamma",
            api_key_env_name: "GAMMA_API_KEY",
            base_url: "https://gamma.example/v1",
            kind: UpstreamKind::OpenAiCompatible,
        },
    ];

    fn model_config(default: &str, models: &[&str]) -> ProviderModelConfig {
        ProviderModelConfig {
            default: default.to_string(),
            enable_fallback: true,
            models: models.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn all_keyed(keys: &[&str]) -> impl Fn(&str) -> Option<String> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        move |name| keys.iter().any(|k| k == name).then(|| "present".to_string())
    }

    #[test]
    fn providers_without_an_api_key_are_excluded() {
        let mut snapshot = ModelsSnapshot::new();
        snapshot.insert("alpha".to_string(), model_config("m1", &["m1"]));
        snapshot.insert("beta".to_string(), model_config("m1", &["m1"]));

        let actives = select_active(
            DESCRIPTORS,
            all_keyed(&["ALPHA_API_KEY"]),
            &[],
            &snapshot,
        );
        assert_eq!(actives.len(), 1);
        assert_eq!(actives[0].key, "alpha");
    }

    #[test]
    fn providers_without_a_models_config_entry_are_excluded() {
        let mut snapshot = ModelsSnapshot::new();
        snapshot.insert("alpha".to_string(), model_config("m1", &["m1"]));
        // "beta" has a key but no models config entry.

        let actives = select_active(
            DESCRIPTORS,
            all_keyed(&["ALPHA_API_KEY", "BETA_API_KEY"]),
            &[],
            &snapshot,
        );
        assert_eq!(actives.len(), 1);
        assert_eq!(actives[0].key, "alpha");
    }

    #[test]
    fn providers_with_an_empty_models_list_are_excluded() {
        let mut snapshot = ModelsSnapshot::new();
        snapshot.insert("alpha".to_string(), model_config("m1", &[]));

        let actives = select_active(
            DESCRIPTORS,
            all_keyed(&["ALPHA_API_KEY"]),
            &[],
            &snapshot,
        );
        assert!(actives.is_empty());
    }

    #[test]
    fn disabled_setting_excludes_an_otherwise_eligible_provider() {
        let mut snapshot = ModelsSnapshot::new();
        snapshot.insert("alpha".to_string(), model_config("m1", &["m1"]));

        let settings = vec![ProviderSetting {
            provider_key: "alpha".to_string(),
            is_enabled: false,
            priority: 0,
        }];
        let actives = select_active(DESCRIPTORS, all_keyed(&["ALPHA_API_KEY"]), &settings, &snapshot);
        assert!(actives.is_empty());
    }

    #[test]
    fn no_settings_rows_at_all_treats_every_keyed_provider_as_enabled() {
        let mut snapshot = ModelsSnapshot::new();
        snapshot.insert("alpha".to_string(), model_config("m1", &["m1"]));
        snapshot.insert("beta".to_string(), model_config("m1", &["m1"]));

        let actives = select_active(
            DESCRIPTORS,
            all_keyed(&["ALPHA_API_KEY", "BETA_API_KEY"]),
            &[],
            &snapshot,
        );
        assert_eq!(actives.len(), 2);
    }

    #[test]
    fn active_providers_sort_ascending_by_priority_with_unset_last() {
        let mut snapshot = ModelsSnapshot::new();
        for key in ["alpha", "beta", "gamma"] {
            snapshot.insert(key.to_string(), model_config("m1", &["m1"]));
        }

        let settings = vec![
            ProviderSetting {
                provider_key: "alpha".to_string(),
                is_enabled: true,
                priority: 5,
            },
            ProviderSetting {
                provider_key: "beta".to_string(),
                is_enabled: true,
                priority: 1,
            },
            // "gamma" has no settings row: sorts after both.
        ];

        let actives = select_active(
            DESCRIPTORS,
            all_keyed(&["ALPHA_API_KEY", "BETA_API_KEY", "GAMMA_API_KEY"]),
            &settings,
            &snapshot,
        );
        let keys: Vec<&str> = actives.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["beta", "alpha", "gamma"]);
    }
}
