// worklog-backend/src/main.rs
mod config;
mod db;
mod error_handler;
mod forms;
mod handlers;
mod migrations;
mod models;
pub mod schema;
mod store;
mod views;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use config::AppConfig;
use store::{DailyLogStore, FileRecordStore};

fn cors_for(config: &AppConfig) -> Cors {
    let cors = if config.allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    // .env is a development convenience only.
    if cfg!(debug_assertions) {
        match dotenvy::dotenv() {
            Ok(path) => log::info!(".env file loaded from path: {}", path.display()),
            Err(e) => log::warn!(
                "Could not load .env file: {}, using environment variables.",
                e
            ),
        }
    }

    let app_config = AppConfig::from_env().expect("Invalid configuration in environment");
    log::info!(
        "Database at {}, uploads in {}",
        app_config.database_path.display(),
        app_config.upload_dir.display()
    );

    std::fs::create_dir_all(&app_config.upload_dir)?;

    let pool = db::create_pool(&app_config.database_path)
        .await
        .expect("Failed to create database connection pool.");

    migrations::ensure_schema(&pool)
        .await
        .expect("Failed to create the database schema.");

    let daily_logs = DailyLogStore::new(pool.clone());
    let file_records = FileRecordStore::new(pool.clone(), app_config.upload_dir.clone());

    log::info!("Worklog backend starting...");
    let bind_address = app_config.bind_address();
    log::info!("Server will start at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors_for(&app_config))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(daily_logs.clone()))
            .app_data(web::Data::new(file_records.clone()))
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
