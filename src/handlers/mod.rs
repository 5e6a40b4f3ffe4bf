// worklog-backend/src/handlers/mod.rs
pub mod api_handlers;
pub mod daily_log_handlers;
pub mod page_handlers;
pub mod upload_handlers;

use crate::db::{self, DbPool};
use crate::error_handler::ServiceError;
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

// Healthy when the pool can hand out a connection.
pub async fn health_check_handler(
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ServiceError> {
    match db::connection(&pool).await {
        Ok(_conn) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "message": "Backend is running and DB pool accessible"
        }))),
        Err(e) => {
            log::error!("Failed to get connection from pool: {:?}", e);
            Err(ServiceError::InternalServerError(
                "Failed to check DB pool".to_string(),
            ))
        }
    }
}

/// Every route of the service. App data (`DbPool`, `DailyLogStore`,
/// `FileRecordStore`) is registered by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check_handler)))
        .service(page_handlers::home_handler)
        .service(upload_handlers::upload_file_handler)
        .service(
            web::scope("/work")
                .service(daily_log_handlers::list_daily_logs_handler)
                .service(daily_log_handlers::new_daily_log_handler)
                .service(daily_log_handlers::add_daily_log_handler)
                .service(daily_log_handlers::view_daily_log_handler)
                .service(page_handlers::weekly_handler)
                .service(page_handlers::evtx_handler),
        )
        .service(
            web::scope("/api")
                .service(api_handlers::api_test_handler)
                .service(api_handlers::list_daily_logs_api_handler)
                .service(api_handlers::create_daily_log_api_handler)
                .service(api_handlers::get_daily_log_api_handler)
                .service(api_handlers::list_files_api_handler),
        );
}
