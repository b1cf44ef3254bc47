//! `SeaORM` adapter for the entity store ports.
//!
//! One [`SeaOrmStore`] implements every port; each port lives in its own
//! module next to the row conversions it needs.

mod leave;
mod shift;
mod swap;
mod user;

use sea_orm::{DatabaseConnection, DbErr, RuntimeErr, SqlErr, sqlx};

use rota_core::store::StoreError;

/// Entity store backed by a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Creates a store over an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// SQLSTATE codes for a transaction aborted in favour of a concurrent one:
/// serialization failure and deadlock detected.
const CONTENTION_CODES: [&str; 2] = ["40001", "40P01"];

/// Maps a database error onto the port error, surfacing unique violations
/// and transactions that lost to a concurrent one.
pub(crate) fn store_err(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StoreError::Duplicate(detail);
    }
    if sqlstate(&err).is_some_and(|code| is_contention(&code)) {
        tracing::warn!(error = %err, "transaction aborted by a concurrent update");
        return StoreError::Contention(err.to_string());
    }
    tracing::error!(error = %err, "database operation failed");
    StoreError::Backend(err.to_string())
}

fn sqlstate(err: &DbErr) -> Option<String> {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Conn(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => {
            db.code().map(|code| code.into_owned())
        }
        _ => None,
    }
}

fn is_contention(code: &str) -> bool {
    CONTENTION_CODES.contains(&code)
}
