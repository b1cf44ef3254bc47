//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the schema
//! builder so the same migration runs on PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_initial;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_initial::Migration)]
    }
}
