// worklog-backend/src/handlers/daily_log_handlers.rs
use super::{html, redirect};
use crate::error_handler::ServiceError;
use crate::forms;
use crate::store::{DailyLogStore, StoreError};
use crate::views;
use actix_web::{get, post, web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

pub const DAILY_LIST_PATH: &str = "/work/daily";

#[derive(Deserialize, Debug)]
pub struct DailyListQuery {
    pub duplicate: Option<String>,
}

/// Parses the `work_date` form field. Missing, blank or malformed dates are
/// the client's problem.
pub fn parse_work_date(raw: Option<&str>) -> Result<NaiveDate, ServiceError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        ServiceError::BadRequest("work_date is required.".to_string())
    })?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ServiceError::BadRequest(format!("work_date '{}' is not a YYYY-MM-DD date.", raw))
    })
}

#[get("/daily")]
pub async fn list_daily_logs_handler(
    store: web::Data<DailyLogStore>,
    query: web::Query<DailyListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let logs = store.list_logs().await?;
    Ok(html(views::daily_list_page(&logs, query.duplicate.as_deref())))
}

#[get("/daily/new")]
pub async fn new_daily_log_handler() -> HttpResponse {
    html(views::daily_form_page())
}

#[post("/daily/add")]
pub async fn add_daily_log_handler(
    store: web::Data<DailyLogStore>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let fields = form.into_inner();
    let work_date = parse_work_date(fields.get("work_date").map(String::as_str))?;
    let rows = forms::parse_task_rows(&fields);

    match store.create_log(work_date, rows).await {
        Ok(_) => Ok(redirect(DAILY_LIST_PATH)),
        // Back to the list, which shows the rejected date.
        Err(StoreError::DuplicateDate(date)) => Ok(redirect(&format!(
            "{}?duplicate={}",
            DAILY_LIST_PATH, date
        ))),
        Err(e) => Err(e.into()),
    }
}

#[get("/daily/view/{log_id_path}")]
pub async fn view_daily_log_handler(
    store: web::Data<DailyLogStore>,
    log_id_path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let log_to_find_id = log_id_path.into_inner();

    match store.get_log_detail(log_to_find_id).await? {
        Some(detail) => Ok(html(views::daily_detail_page(&detail))),
        None => Err(ServiceError::NotFound(format!(
            "Daily log with id {} not found",
            log_to_find_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_date_must_be_present_and_iso() {
        assert_eq!(
            parse_work_date(Some(" 2024-03-05 ")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert!(matches!(parse_work_date(None), Err(ServiceError::BadRequest(_))));
        assert!(matches!(parse_work_date(Some("")), Err(ServiceError::BadRequest(_))));
        assert!(matches!(
            parse_work_date(Some("05/03/2024")),
            Err(ServiceError::BadRequest(_))
        ));
    }
}
