use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod listing_db;
pub mod message_db;
pub mod migrations;
pub mod review_db;
pub mod tender_db;
pub mod user_db;

/// Opens the pooled connection to the store. Foreign keys are enforced on
/// every pooled connection; the messages and reviews tables rely on it.
/// Fails if the parent directory does not exist.
pub async fn connect(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// In-memory store with the full schema applied, for tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // One connection only: each pooled connection would otherwise open its
    // own empty in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    migrations::run_migrations(&pool).await.unwrap();
    pool
}
