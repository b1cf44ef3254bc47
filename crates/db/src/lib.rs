//! Database layer with `SeaORM` entities and the entity store adapter.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - [`SeaOrmStore`], implementing the `rota-core` store ports
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::SeaOrmStore;

use std::time::Duration;

use rota_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the configured database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    tracing::debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "connecting to database"
    );
    Database::connect(options).await
}
