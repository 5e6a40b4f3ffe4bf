use crate::schema::{daily_logs, daily_tasks, file_history};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

// Timestamps go out in the same shape the database stores: "YYYY-MM-DD HH:MM:SS".
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_timestamp<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

fn serialize_opt_timestamp<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serialize_timestamp(ts, serializer),
        None => serializer.serialize_none(),
    }
}

// --- DailyLog Model ---
#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = daily_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyLog {
    pub id: i32,
    pub work_date: NaiveDate,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = daily_logs)]
pub struct NewDailyLog {
    pub work_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

// --- DailyTask Model ---
#[derive(
    Queryable, Selectable, Identifiable, Associations, Serialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = daily_tasks)]
#[diesel(belongs_to(DailyLog, foreign_key = log_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyTask {
    pub id: i32,
    pub log_id: i32,
    pub work_time: Option<String>,
    pub task_type: Option<String>,
    pub task_details: Option<String>,
    pub task_result: Option<String>,
    pub future_plan: Option<String>,
    pub notes: Option<String>,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = daily_tasks)]
pub struct NewDailyTask {
    pub log_id: i32,
    pub work_time: Option<String>,
    pub task_type: Option<String>,
    pub task_details: Option<String>,
    pub task_result: Option<String>,
    pub future_plan: Option<String>,
    pub notes: Option<String>,
}

impl NewDailyTask {
    /// Builds the child row for `log_id`. Blank strings become NULL, except
    /// `work_time`, which is always set (possibly to "").
    pub fn from_row(log_id: i32, row: TaskRowInput) -> Self {
        let work_time = row.work_time();
        NewDailyTask {
            log_id,
            work_time: Some(work_time),
            task_type: non_empty(row.task_type),
            task_details: non_empty(row.task_details),
            task_result: non_empty(row.task_result),
            future_plan: non_empty(row.future_plan),
            notes: non_empty(row.notes),
        }
    }
}

/// A parent log together with its tasks in insertion order.
#[derive(Serialize, Debug, Clone)]
pub struct DailyLogDetail {
    pub log: DailyLog,
    pub tasks: Vec<DailyTask>,
}

// --- FileRecord Model ---
#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = file_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FileRecord {
    pub id: i32,
    pub filename: String,
    pub file_type: Option<String>,
    #[serde(serialize_with = "serialize_opt_timestamp")]
    pub upload_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = file_history)]
pub struct NewFileRecord {
    pub filename: String,
    pub file_type: Option<String>,
    pub upload_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub category: Option<String>,
}

// --- PAYLOAD DTOs ---

/// One submitted task row. Every field may be missing; rows with nothing in
/// `task_type`, `task_details` and `task_result` are not stored.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TaskRowInput {
    pub task_type: Option<String>,
    pub task_details: Option<String>,
    pub task_result: Option<String>,
    pub work_time_am: Option<String>,
    pub work_time_pm: Option<String>,
    pub future_plan: Option<String>,
    pub notes: Option<String>,
}

impl TaskRowInput {
    pub fn is_blank(&self) -> bool {
        [&self.task_type, &self.task_details, &self.task_result]
            .iter()
            .all(|field| field.as_deref().map_or(true, str::is_empty))
    }

    /// Comma-joined AM/PM markers, in that order, skipping empty ones.
    pub fn work_time(&self) -> String {
        [&self.work_time_am, &self.work_time_pm]
            .iter()
            .filter_map(|marker| marker.as_deref())
            .filter(|marker| !marker.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateDailyLogPayload {
    pub work_date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<TaskRowInput>,
}

#[derive(Deserialize, Debug, Default)]
pub struct FileQueryParams {
    pub suffix: Option<String>,
    pub category: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
