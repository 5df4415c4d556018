//! Relational adapters
//!
//! Implementations of the repository port using SeaORM. Works against
//! PostgreSQL and SQLite; the schema is created from the entity
//! definitions at startup.

pub mod amenity_repo;
pub mod place_repo;
pub mod review_repo;
pub mod schema;
pub mod user_repo;

#[cfg(test)]
mod integration_tests;

use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};

use crate::error::DomainError;

pub use amenity_repo::DbAmenityRepository;
pub use place_repo::DbPlaceRepository;
pub use review_repo::DbReviewRepository;
pub use schema::create_schema;
pub use user_repo::DbUserRepository;

const MEMORY_DB_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Open a connection pool. An in-memory SQLite database only exists per
/// connection, so its pool is pinned to one long-lived connection.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    if url.starts_with("sqlite") && url.contains(":memory:") {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(MEMORY_DB_LIFETIME)
            .max_lifetime(MEMORY_DB_LIFETIME);
    }
    options.sqlx_logging(false);
    Database::connect(options).await
}

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub(crate) fn utc(dt: DateTimeWithTimeZone) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}
