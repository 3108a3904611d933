//! Caller API key issuance and validation (spec.md §4.6).

use crate::storage::database::entities::api_key::{self, Entity as ApiKeyEntity};
use crate::utils::error::{GatewayError, Result};
use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};

const KEY_PREFIX: &str = "sk-";
const KEY_BODY_HEX_CHARS: usize = 64;

/// A stored key's metadata, with the hash omitted — safe to return to callers.
#[derive(Debug, Clone)]
pub struct ApiKeyRecord {
    pub id: i64,
    pub key_prefix: String,
    pub name: Option<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub last_used_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub is_active: bool,
    pub usage_count: i64,
}

impl From<api_key::Model> for ApiKeyRecord {
    fn from(row: api_key::Model) -> Self {
        Self {
            id: row.id,
            key_prefix: row.key_prefix,
            name: row.name,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
            is_active: row.is_active,
            usage_count: row.usage_count,
        }
    }
}

/// Generates a fresh CSPRNG key: `"sk-"` plus 64 hex characters, i.e. 32
/// random bytes hex-encoded.
fn generate_plaintext_key() -> String {
    let raw: [u8; KEY_BODY_HEX_CHARS / 2] = rand::thread_rng().r#gen();
    format!("{KEY_PREFIX}{}", hex::encode(raw))
}

fn hash_key(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

fn key_prefix_display(plaintext: &str) -> String {
    format!("{}...", &plaintext[..7.min(plaintext.len())])
}

/// Persists and validates caller API keys.
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issue a new key. Returns the plaintext (shown to the caller exactly
    /// once) and the stored record.
    pub async fn create(&self, name: Option<String>) -> Result<(String, ApiKeyRecord)> {
        let plaintext = generate_plaintext_key();
        let now = Utc::now().into();
        let active = api_key::ActiveModel {
            key_hash: Set(hash_key(&plaintext)),
            key_prefix: Set(key_prefix_display(&plaintext)),
            name: Set(name),
            created_at: Set(now),
            last_used_at: Set(None),
            is_active: Set(true),
            usage_count: Set(0),
            ..Default::default()
        };
        let inserted = active.insert(&self.db).await.map_err(GatewayError::Database)?;
        Ok((plaintext, inserted.into()))
    }

    /// Validate a presented key. On success, atomically bumps
    /// `last_used_at`/`usage_count` and returns the record.
    pub async fn validate(&self, presented: &str) -> Result<Option<ApiKeyRecord>> {
        if !presented.starts_with(KEY_PREFIX) {
            return Ok(None);
        }
        let hash = hash_key(presented);
        let row = ApiKeyEntity::find()
            .filter(api_key::Column::KeyHash.eq(hash))
            .one(&self.db)
            .await
            .map_err(GatewayError::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };
        if !row.is_active {
            return Ok(None);
        }

        let usage_count = row.usage_count + 1;
        let mut active: api_key::ActiveModel = row.into();
        active.last_used_at = Set(Some(Utc::now().into()));
        active.usage_count = Set(usage_count);
        let updated = active.update(&self.db).await.map_err(GatewayError::Database)?;
        Ok(Some(updated.into()))
    }

    /// All records, hashes omitted.
    pub async fn list(&self) -> Result<Vec<ApiKeyRecord>> {
        let rows = ApiKeyEntity::find()
            .all(&self.db)
            .await
            .map_err(GatewayError::Database)?;
        Ok(rows.into_iter().map(ApiKeyRecord::from).collect())
    }

    /// Deactivate a key; it remains in the store for audit purposes.
    pub async fn revoke(&self, id: i64) -> Result<()> {
        let row = ApiKeyEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(GatewayError::Database)?
            .ok_or_else(|| GatewayError::InvalidRequest(format!("no such key: {id}")))?;
        let mut active: api_key::ActiveModel = row.into();
        active.is_active = Set(false);
        active.update(&self.db).await.map_err(GatewayError::Database)?;
        Ok(())
    }

    /// Remove a key's row entirely.
    pub async fn delete(&self, id: i64) -> Result<()> {
        ApiKeyEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(GatewayError::Database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_have_expected_shape() {
        let key = generate_plaintext_key();
        assert!(key.starts_with(KEY_PREFIX));
        assert_eq!(key.len(), KEY_PREFIX.len() + KEY_BODY_HEX_CHARS);
        assert!(key[KEY_PREFIX.len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn prefix_display_is_first_seven_chars_plus_ellipsis() {
        let key = "sk-abcdef0123456789";
        assert_eq!(key_prefix_display(key), "sk-abcd...");
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash_key("sk-abc"), hash_key("sk-abc"));
        assert_ne!(hash_key("sk-abc"), hash_key("sk-abd"));
    }
}
