//! Durable, validated per-provider model lists (spec.md §4.2).
//!
//! Backed by a single JSON file at a fixed path. Reads may be served from a
//! short-lived snapshot cache; every successful write invalidates it.

use crate::utils::error::{GatewayError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const CACHE_TTL: Duration = Duration::from_secs(1);

/// Per-provider model list and fallback toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderModelConfig {
    pub default: String,
    #[serde(rename = "enableFallback")]
    pub enable_fallback: bool,
    pub models: Vec<String>,
}

/// The whole document: provider key -> its model config.
pub type ModelsSnapshot = HashMap<String, ProviderModelConfig>;

/// Validates a full snapshot per spec.md §4.2.
fn validate(snapshot: &ModelsSnapshot) -> Result<()> {
    if snapshot.is_empty() {
        return Err(GatewayError::ModelsConfig(
            "models config must be a non-empty mapping".into(),
        ));
    }
    for (key, cfg) in snapshot {
        if cfg.default.trim().is_empty() {
            return Err(GatewayError::ModelsConfig(format!(
                "provider {key}: default must be non-empty"
            )));
        }
        if cfg.models.is_empty() {
            return Err(GatewayError::ModelsConfig(format!(
                "provider {key}: models must be non-empty"
            )));
        }
        if cfg.models.iter().any(|m| m.trim().is_empty()) {
            return Err(GatewayError::ModelsConfig(format!(
                "provider {key}: models must not contain empty strings"
            )));
        }
        if !cfg.models.contains(&cfg.default) {
            return Err(GatewayError::ModelsConfig(format!(
                "provider {key}: default must be one of models"
            )));
        }
    }
    Ok(())
}

/// File-backed store of the models document.
pub struct ModelsConfig {
    path: PathBuf,
    cache: Mutex<Option<(Instant, ModelsSnapshot)>>,
}

impl ModelsConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    fn load_from_disk(&self) -> Result<ModelsSnapshot> {
        let data = std::fs::read_to_string(&self.path)?;
        let snapshot: ModelsSnapshot = serde_json::from_str(&data)?;
        validate(&snapshot)?;
        Ok(snapshot)
    }

    /// Read the current snapshot, serving from cache when fresh.
    pub fn read(&self) -> Result<ModelsSnapshot> {
        {
            let cache = self.cache.lock();
            if let Some((fetched_at, snapshot)) = cache.as_ref() {
                if fetched_at.elapsed() < CACHE_TTL {
                    return Ok(snapshot.clone());
                }
            }
        }
        let snapshot = self.load_from_disk()?;
        *self.cache.lock() = Some((Instant::now(), snapshot.clone()));
        Ok(snapshot)
    }

    /// Validate and atomically replace the on-disk document.
    pub fn save(&self, snapshot: ModelsSnapshot) -> Result<()> {
        validate(&snapshot)?;
        write_atomic(&self.path, &snapshot)?;
        *self.cache.lock() = Some((Instant::now(), snapshot));
        Ok(())
    }

    pub fn add_model(&self, provider_key: &str, model: &str) -> Result<()> {
        let mut snapshot = self.read()?;
        let cfg = snapshot
            .get_mut(provider_key)
            .ok_or_else(|| unknown_provider(provider_key))?;
        if cfg.models.iter().any(|m| m == model) {
            return Err(GatewayError::ModelsConfig(format!(
                "model {model} already exists for provider {provider_key}"
            )));
        }
        cfg.models.push(model.to_string());
        self.save(snapshot)
    }

    pub fn remove_model(&self, provider_key: &str, model: &str) -> Result<()> {
        let mut snapshot = self.read()?;
        let cfg = snapshot
            .get_mut(provider_key)
            .ok_or_else(|| unknown_provider(provider_key))?;
        if !cfg.models.iter().any(|m| m == model) {
            return Err(GatewayError::ModelsConfig(format!(
                "model {model} not found for provider {provider_key}"
            )));
        }
        if cfg.default == model {
            return Err(GatewayError::ModelsConfig(
                "cannot remove the current default model".into(),
            ));
        }
        if cfg.models.len() == 1 {
            return Err(GatewayError::ModelsConfig(
                "cannot remove the sole model of a provider".into(),
            ));
        }
        cfg.models.retain(|m| m != model);
        self.save(snapshot)
    }

    pub fn set_default(&self, provider_key: &str, model: &str) -> Result<()> {
        let mut snapshot = self.read()?;
        let cfg = snapshot
            .get_mut(provider_key)
            .ok_or_else(|| unknown_provider(provider_key))?;
        if !cfg.models.iter().any(|m| m == model) {
            return Err(GatewayError::ModelsConfig(format!(
                "model {model} is not in the models list"
            )));
        }
        cfg.default = model.to_string();
        self.save(snapshot)
    }

    /// If `desired` is omitted, flips the current value. Returns the new value.
    pub fn toggle_fallback(&self, provider_key: &str, desired: Option<bool>) -> Result<bool> {
        let mut snapshot = self.read()?;
        let cfg = snapshot
            .get_mut(provider_key)
            .ok_or_else(|| unknown_provider(provider_key))?;
        cfg.enable_fallback = desired.unwrap_or(!cfg.enable_fallback);
        let new_value = cfg.enable_fallback;
        self.save(snapshot)?;
        Ok(new_value)
    }

    pub fn reorder_models(&self, provider_key: &str, new_order: Vec<String>) -> Result<()> {
        let mut snapshot = self.read()?;
        let cfg = snapshot
            .get_mut(provider_key)
            .ok_or_else(|| unknown_provider(provider_key))?;
        if new_order.len() != cfg.models.len() {
            return Err(GatewayError::ModelsConfig(
                "reorder must be a permutation of the current models (length mismatch)".into(),
            ));
        }
        let mut sorted_current = cfg.models.clone();
        sorted_current.sort();
        let mut sorted_new = new_order.clone();
        sorted_new.sort();
        if sorted_current != sorted_new {
            return Err(GatewayError::ModelsConfig(
                "reorder must be a permutation of the current models (not a rearrangement)".into(),
            ));
        }
        cfg.models = new_order;
        self.save(snapshot)
    }

    pub fn update_model(&self, provider_key: &str, old: &str, new: &str) -> Result<()> {
        let mut snapshot = self.read()?;
        let cfg = snapshot
            .get_mut(provider_key)
            .ok_or_else(|| unknown_provider(provider_key))?;
        let pos = cfg
            .models
            .iter()
            .position(|m| m == old)
            .ok_or_else(|| GatewayError::ModelsConfig(format!("model {old} not found")))?;
        cfg.models[pos] = new.to_string();
        if cfg.default == old {
            cfg.default = new.to_string();
        }
        self.save(snapshot)
    }
}

fn unknown_provider(key: &str) -> GatewayError {
    GatewayError::ModelsConfig(format!("unknown provider {key}"))
}

fn write_atomic(path: &Path, snapshot: &ModelsSnapshot) -> Result<()> {
    let serialized = serde_json::to_string_pretty(snapshot)?;
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
