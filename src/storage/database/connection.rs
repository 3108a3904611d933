//! Embedded-database connection and migration bootstrap.

use super::migration::Migrator;
use crate::utils::error::{GatewayError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

/// Open the configured database, applying any pending migrations.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_string());
    opt.max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(true);

    let connection = Database::connect(opt)
        .await
        .map_err(GatewayError::Database)?;

    info!("database connection established");

    Migrator::up(&connection, None)
        .await
        .map_err(GatewayError::Database)?;

    info!("database migrations applied");

    Ok(connection)
}
