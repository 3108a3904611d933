use sea_orm_migration::prelude::*;

mod m20240101_000001_create_api_keys_table;
mod m20240101_000002_create_provider_settings_table;

/// Database migrator for SeaORM.
///
/// The repository's own `_migrations` bookkeeping table is managed by
/// `sea-orm-migration` internally (spec.md §6.2).
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_api_keys_table::Migration),
            Box::new(m20240101_000002_create_provider_settings_table::Migration),
        ]
    }
}
