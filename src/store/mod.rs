// worklog-backend/src/store/mod.rs
pub mod daily_log_store;
pub mod file_record_store;

pub use daily_log_store::DailyLogStore;
pub use file_record_store::FileRecordStore;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use diesel_async::pooled_connection::bb8::RunError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A log for this date already exists. Recoverable: tell the user.
    #[error("a daily log for {0} already exists")]
    DuplicateDate(NaiveDate),
    #[error("an uploaded file needs a non-empty filename")]
    InvalidFilename,
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] RunError),
}

/// Local wall-clock time truncated to whole seconds.
pub(crate) fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
