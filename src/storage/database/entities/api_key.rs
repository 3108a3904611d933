use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Row in the `api_keys` table (spec.md §6.2).
///
/// The plaintext key is never stored; only its SHA-256 hash.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique, column_name = "key_hash")]
    pub key_hash: String,

    pub key_prefix: String,

    pub name: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub last_used_at: Option<DateTimeWithTimeZone>,

    pub is_active: bool,

    pub usage_count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
