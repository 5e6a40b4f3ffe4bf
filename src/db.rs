// worklog-backend/src/db.rs
use diesel::sqlite::SqliteConnection;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection, RunError};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, PoolError};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::SimpleAsyncConnection;
use std::path::Path;

// SQLite has no async driver, so blocking calls run on the tokio blocking pool.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

pub type DbPool = Pool<SqliteConn>;
pub type DbConnection<'a> = PooledConnection<'a, SqliteConn>;

const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

pub async fn create_pool(database_path: &Path) -> Result<DbPool, Box<dyn std::error::Error>> {
    let database_url = database_path.to_string_lossy().into_owned();
    let config = AsyncDieselConnectionManager::<SqliteConn>::new(database_url);
    let pool = Pool::builder()
        .max_size(10)
        .build(config)
        .await?;

    Ok(pool)
}

/// Checks a connection out of the pool with the per-connection pragmas applied.
/// The connection goes back to the pool when the guard is dropped.
pub async fn connection(pool: &DbPool) -> Result<DbConnection<'_>, RunError> {
    let mut conn = pool.get().await?;
    conn.batch_execute(CONNECTION_PRAGMAS)
        .await
        .map_err(|e| RunError::User(PoolError::QueryError(e)))?;
    Ok(conn)
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::migrations;
    use tempfile::TempDir;

    /// A pool over a fresh database file with the schema in place. Keep the
    /// `TempDir` alive for as long as the pool is used.
    pub async fn fresh_pool() -> (TempDir, DbPool) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let pool = create_pool(&dir.path().join("worklog.db"))
            .await
            .expect("create pool");
        migrations::ensure_schema(&pool)
            .await
            .expect("create schema");
        (dir, pool)
    }
}
