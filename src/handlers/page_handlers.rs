// worklog-backend/src/handlers/page_handlers.rs
use super::html;
use crate::error_handler::ServiceError;
use crate::store::FileRecordStore;
use crate::views;
use actix_web::{get, web, HttpResponse};

pub const EVTX_SUFFIX: &str = ".evtx";

#[get("/")]
pub async fn home_handler() -> HttpResponse {
    html(views::home_page())
}

#[get("/weekly")]
pub async fn weekly_handler(
    store: web::Data<FileRecordStore>,
) -> Result<HttpResponse, ServiceError> {
    let files = store.list_files_by_category("weekly").await?;
    Ok(html(views::weekly_page(&files)))
}

#[get("/evtx")]
pub async fn evtx_handler(store: web::Data<FileRecordStore>) -> Result<HttpResponse, ServiceError> {
    let files = store.list_files_by_suffix(EVTX_SUFFIX).await?;
    Ok(html(views::evtx_page(&files)))
}
