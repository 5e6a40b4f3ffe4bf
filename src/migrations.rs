// worklog-backend/src/migrations.rs
//! Startup schema setup: creates the three tables and moves a legacy
//! single-table `daily_logs` out of the way.
use crate::db::{self, DbConnection, DbPool};
use crate::store::StoreError;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};

const LEGACY_TABLE: &str = "daily_logs";
const LEGACY_BACKUP_TABLE: &str = "daily_logs_old";
const CURRENT_LOG_COLUMNS: [&str; 3] = ["id", "work_date", "created_at"];

const CREATE_TABLES_SQL: &str = r"
CREATE TABLE IF NOT EXISTS file_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    filename    TEXT NOT NULL,
    file_type   TEXT,
    upload_date TEXT,
    status      TEXT,
    category    TEXT
);

CREATE TABLE IF NOT EXISTS daily_logs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    work_date  TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS daily_tasks (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    log_id       INTEGER NOT NULL,
    work_time    TEXT,
    task_type    TEXT,
    task_details TEXT,
    task_result  TEXT,
    future_plan  TEXT,
    notes        TEXT,
    FOREIGN KEY (log_id) REFERENCES daily_logs (id)
);
";

#[derive(QueryableByName, Debug)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Brings the database up to the current layout. The legacy rename runs
/// first and can only log; table creation failures are returned.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), StoreError> {
    let mut conn = db::connection(pool).await?;

    match backup_legacy_log_table(&mut conn).await {
        Ok(true) => log::info!(
            "Legacy '{}' table renamed to '{}'",
            LEGACY_TABLE,
            LEGACY_BACKUP_TABLE
        ),
        Ok(false) => log::debug!("No legacy '{}' table to back up", LEGACY_TABLE),
        Err(e) => log::warn!(
            "Skipping legacy '{}' backup after error: {}",
            LEGACY_TABLE,
            e
        ),
    }

    conn.batch_execute(CREATE_TABLES_SQL).await?;
    log::info!("Database schema is ready");
    Ok(())
}

/// Renames an old-shape `daily_logs` to `daily_logs_old`. Returns whether a
/// rename happened. A table that already has the current shape is left alone,
/// and nothing happens once the backup table exists.
async fn backup_legacy_log_table(conn: &mut DbConnection<'_>) -> QueryResult<bool> {
    if table_exists(conn, LEGACY_BACKUP_TABLE).await? {
        return Ok(false);
    }
    if !table_exists(conn, LEGACY_TABLE).await? {
        return Ok(false);
    }

    let mut columns = table_columns(conn, LEGACY_TABLE).await?;
    columns.sort();
    let mut current: Vec<&str> = CURRENT_LOG_COLUMNS.to_vec();
    current.sort_unstable();
    if columns == current {
        return Ok(false);
    }

    conn.batch_execute(&format!(
        "ALTER TABLE {} RENAME TO {}",
        LEGACY_TABLE, LEGACY_BACKUP_TABLE
    ))
    .await?;
    Ok(true)
}

async fn table_exists(conn: &mut DbConnection<'_>, table: &str) -> QueryResult<bool> {
    let rows = diesel::sql_query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
        .bind::<Text, _>(table.to_string())
        .load::<NameRow>(conn)
        .await?;
    Ok(!rows.is_empty())
}

async fn table_columns(conn: &mut DbConnection<'_>, table: &str) -> QueryResult<Vec<String>> {
    let rows = diesel::sql_query("SELECT name FROM pragma_table_info(?)")
        .bind::<Text, _>(table.to_string())
        .load::<NameRow>(conn)
        .await?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}
