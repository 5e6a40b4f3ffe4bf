// worklog-backend/src/store/daily_log_store.rs
use super::{now_local, StoreError};
use crate::db::{self, DbPool};
use crate::models::{DailyLog, DailyLogDetail, DailyTask, NewDailyLog, NewDailyTask, TaskRowInput};
use crate::schema::{daily_logs, daily_tasks};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

/// Daily logs (one per work date) and their task rows.
#[derive(Clone)]
pub struct DailyLogStore {
    pool: DbPool,
}

impl DailyLogStore {
    pub fn new(pool: DbPool) -> Self {
        DailyLogStore { pool }
    }

    /// All logs, newest work date first.
    pub async fn list_logs(&self) -> Result<Vec<DailyLog>, StoreError> {
        let mut conn = db::connection(&self.pool).await?;

        let logs = daily_logs::table
            .order(daily_logs::work_date.desc())
            .select(DailyLog::as_select())
            .load::<DailyLog>(&mut conn)
            .await?;

        Ok(logs)
    }

    /// Creates the log for `work_date` and one task per non-blank row, all in
    /// one transaction. Nothing is kept if any insert fails.
    pub async fn create_log(
        &self,
        work_date: NaiveDate,
        rows: Vec<TaskRowInput>,
    ) -> Result<DailyLog, StoreError> {
        let new_log = NewDailyLog {
            work_date,
            created_at: now_local(),
        };
        let submitted = rows.len();

        let mut conn = db::connection(&self.pool).await?;

        let (log, task_count) = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    let log = diesel::insert_into(daily_logs::table)
                        .values(new_log)
                        .returning(DailyLog::as_returning())
                        .get_result::<DailyLog>(conn)
                        .await
                        .map_err(|e| match e {
                            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                                StoreError::DuplicateDate(work_date)
                            }
                            other => StoreError::Database(other),
                        })?;

                    let mut task_count = 0usize;
                    for row in rows.into_iter().filter(|row| !row.is_blank()) {
                        diesel::insert_into(daily_tasks::table)
                            .values(NewDailyTask::from_row(log.id, row))
                            .execute(conn)
                            .await?;
                        task_count += 1;
                    }

                    Ok((log, task_count))
                }
                .scope_boxed()
            })
            .await
            .inspect_err(|e| match e {
                StoreError::DuplicateDate(date) => {
                    log::warn!("Rejected daily log for {}: date already exists", date)
                }
                other => log::error!("Daily log creation for {} rolled back: {}", work_date, other),
            })?;

        log::info!(
            "Created daily log {} for {} with {} task(s) ({} row(s) submitted)",
            log.id,
            log.work_date,
            task_count,
            submitted
        );
        Ok(log)
    }

    /// The log and its tasks in insertion order, or `None` if there is no such log.
    pub async fn get_log_detail(&self, log_id: i32) -> Result<Option<DailyLogDetail>, StoreError> {
        let mut conn = db::connection(&self.pool).await?;

        let log = daily_logs::table
            .find(log_id)
            .select(DailyLog::as_select())
            .first::<DailyLog>(&mut conn)
            .await
            .optional()?;

        let Some(log) = log else {
            return Ok(None);
        };

        let tasks = DailyTask::belonging_to(&log)
            .order(daily_tasks::id.asc())
            .select(DailyTask::as_select())
            .load::<DailyTask>(&mut conn)
            .await?;

        Ok(Some(DailyLogDetail { log, tasks }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::fresh_pool;
    use diesel_async::SimpleAsyncConnection;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(task_type: &str) -> TaskRowInput {
        TaskRowInput {
            task_type: Some(task_type.to_string()),
            ..TaskRowInput::default()
        }
    }

    async fn task_count(pool: &DbPool) -> i64 {
        let mut conn = db::connection(pool).await.unwrap();
        daily_tasks::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn create_keeps_only_non_blank_rows() {
        let (_dir, pool) = fresh_pool().await;
        let store = DailyLogStore::new(pool.clone());

        let rows = vec![
            TaskRowInput {
                task_type: Some("Inspection".to_string()),
                work_time_am: Some("AM".to_string()),
                work_time_pm: Some("PM".to_string()),
                ..TaskRowInput::default()
            },
            TaskRowInput::default(),
            TaskRowInput {
                task_details: Some("Patched server".to_string()),
                work_time_pm: Some("PM".to_string()),
                ..TaskRowInput::default()
            },
            TaskRowInput {
                future_plan: Some("only a plan".to_string()),
                notes: Some("only notes".to_string()),
                ..TaskRowInput::default()
            },
            TaskRowInput {
                task_result: Some("Done".to_string()),
                ..TaskRowInput::default()
            },
        ];

        let log = store.create_log(date("2024-04-01"), rows).await.unwrap();
        assert_eq!(log.work_date, date("2024-04-01"));

        let detail = store.get_log_detail(log.id).await.unwrap().unwrap();
        let work_times: Vec<_> = detail
            .tasks
            .iter()
            .map(|t| t.work_time.clone().unwrap_or_default())
            .collect();
        assert_eq!(work_times, vec!["AM,PM", "PM", ""]);
        assert_eq!(task_count(&pool).await, 3);
        assert!(detail.tasks.iter().all(|t| t.log_id == log.id));
    }

    #[actix_web::test]
    async fn duplicate_date_is_rejected_without_side_effects() {
        let (_dir, pool) = fresh_pool().await;
        let store = DailyLogStore::new(pool.clone());

        store
            .create_log(date("2024-02-10"), vec![task("first")])
            .await
            .unwrap();
        let logs_before = store.list_logs().await.unwrap();
        let tasks_before = task_count(&pool).await;

        let err = store
            .create_log(date("2024-02-10"), vec![task("second"), task("third")])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateDate(d) if d == date("2024-02-10")));
        assert_eq!(store.list_logs().await.unwrap(), logs_before);
        assert_eq!(task_count(&pool).await, tasks_before);
    }

    #[actix_web::test]
    async fn failed_task_insert_rolls_back_the_log() {
        let (_dir, pool) = fresh_pool().await;
        let store = DailyLogStore::new(pool.clone());
        {
            let mut conn = db::connection(&pool).await.unwrap();
            conn.batch_execute(
                "CREATE TRIGGER reject_bad_task BEFORE INSERT ON daily_tasks \
                 WHEN NEW.task_type = 'bad' BEGIN SELECT RAISE(ABORT, 'rejected task'); END;",
            )
            .await
            .unwrap();
        }

        let err = store
            .create_log(date("2024-02-11"), vec![task("ok"), task("bad")])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Database(_)));
        assert!(store.list_logs().await.unwrap().is_empty());
        assert_eq!(task_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn logs_are_listed_newest_date_first() {
        let (_dir, pool) = fresh_pool().await;
        let store = DailyLogStore::new(pool);

        for d in ["2024-01-01", "2024-03-05", "2024-02-10"] {
            store.create_log(date(d), Vec::new()).await.unwrap();
        }

        let dates: Vec<_> = store
            .list_logs()
            .await
            .unwrap()
            .into_iter()
            .map(|log| log.work_date)
            .collect();
        assert_eq!(
            dates,
            vec![date("2024-03-05"), date("2024-02-10"), date("2024-01-01")]
        );
    }

    #[actix_web::test]
    async fn detail_returns_tasks_in_insertion_order() {
        let (_dir, pool) = fresh_pool().await;
        let store = DailyLogStore::new(pool);

        // Contents sort differently from insertion order on purpose.
        let log = store
            .create_log(date("2024-05-20"), vec![task("Zulu"), task("Alpha"), task("Mike")])
            .await
            .unwrap();
        store
            .create_log(date("2024-05-21"), vec![task("Other day")])
            .await
            .unwrap();

        let detail = store.get_log_detail(log.id).await.unwrap().unwrap();
        assert_eq!(detail.log, log);
        let types: Vec<_> = detail
            .tasks
            .iter()
            .map(|t| t.task_type.clone().unwrap())
            .collect();
        assert_eq!(types, vec!["Zulu", "Alpha", "Mike"]);
    }

    #[actix_web::test]
    async fn missing_log_detail_is_none() {
        let (_dir, pool) = fresh_pool().await;
        let store = DailyLogStore::new(pool);

        assert!(store.get_log_detail(404).await.unwrap().is_none());
    }
}
