// worklog-backend/src/handlers/api_handlers.rs
// JSON routes for the separate front-end; same stores as the HTML pages.
use crate::error_handler::ServiceError;
use crate::models::{CreateDailyLogPayload, FileQueryParams};
use crate::store::{DailyLogStore, FileRecordStore};
use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

#[get("/test")]
pub async fn api_test_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "API is working!" }))
}

#[get("/work/daily")]
pub async fn list_daily_logs_api_handler(
    store: web::Data<DailyLogStore>,
) -> Result<HttpResponse, ServiceError> {
    let logs = store.list_logs().await?;
    Ok(HttpResponse::Ok().json(logs))
}

#[post("/work/daily")]
pub async fn create_daily_log_api_handler(
    store: web::Data<DailyLogStore>,
    payload: web::Json<CreateDailyLogPayload>,
) -> Result<HttpResponse, ServiceError> {
    let payload = payload.into_inner();
    let log = store.create_log(payload.work_date, payload.tasks).await?;
    Ok(HttpResponse::Created().json(log))
}

#[get("/work/daily/{log_id_path}")]
pub async fn get_daily_log_api_handler(
    store: web::Data<DailyLogStore>,
    log_id_path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let log_to_find_id = log_id_path.into_inner();

    match store.get_log_detail(log_to_find_id).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Err(ServiceError::NotFound(format!(
            "Daily log with id {} not found",
            log_to_find_id
        ))),
    }
}

#[get("/files")]
pub async fn list_files_api_handler(
    store: web::Data<FileRecordStore>,
    query: web::Query<FileQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let FileQueryParams { suffix, category } = query.into_inner();

    let files = match (suffix, category) {
        (Some(suffix), category) => {
            let mut files = store.list_files_by_suffix(&suffix).await?;
            if let Some(category) = category {
                files.retain(|f| f.category.as_deref() == Some(category.as_str()));
            }
            files
        }
        (None, Some(category)) => store.list_files_by_category(&category).await?,
        (None, None) => store.list_files().await?,
    };

    Ok(HttpResponse::Ok().json(files))
}
