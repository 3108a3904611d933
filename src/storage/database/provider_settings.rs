//! Per-provider enable flag and priority (spec.md §3, §6.2).

use super::entities::provider_setting::{self, Entity as ProviderSettingEntity};
use crate::utils::error::{GatewayError, Result};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// One row as read by `ProviderRegistry`.
#[derive(Debug, Clone)]
pub struct ProviderSetting {
    pub provider_key: String,
    pub is_enabled: bool,
    pub priority: i32,
}

/// Persists and serves `ProviderSetting` rows.
pub struct ProviderSettingsStore {
    db: DatabaseConnection,
}

impl ProviderSettingsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All known settings rows, in no particular order.
    ///
    /// An empty result means no settings have ever been written; callers
    /// (`ProviderRegistry`) treat that as "every known provider enabled".
    pub async fn list_all(&self) -> Result<Vec<ProviderSetting>> {
        let rows = ProviderSettingEntity::find()
            .all(&self.db)
            .await
            .map_err(GatewayError::Database)?;
        Ok(rows
            .into_iter()
            .map(|row| ProviderSetting {
                provider_key: row.provider_key,
                is_enabled: row.is_enabled,
                priority: row.priority,
            })
            .collect())
    }

    /// Create or update the setting row for a provider key.
    pub async fn upsert(&self, provider_key: &str, is_enabled: bool, priority: i32) -> Result<()> {
        let existing = ProviderSettingEntity::find()
            .filter(provider_setting::Column::ProviderKey.eq(provider_key))
            .one(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        let now = Utc::now().into();
        match existing {
            Some(row) => {
                let mut active: provider_setting::ActiveModel = row.into();
                active.is_enabled = Set(is_enabled);
                active.priority = Set(priority);
                active.updated_at = Set(now);
                active.update(&self.db).await.map_err(GatewayError::Database)?;
            }
            None => {
                let active = provider_setting::ActiveModel {
                    provider_key: Set(provider_key.to_string()),
                    is_enabled: Set(is_enabled),
                    priority: Set(priority),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&self.db).await.map_err(GatewayError::Database)?;
            }
        }
        Ok(())
    }
}
