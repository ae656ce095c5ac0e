mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod response;
#[cfg(test)]
mod testing;

use crate::config::Config;
use crate::database::sqlx::SqliteSqlxManager;
use crate::impls::cache::SurveyCache;
use crate::impls::generators::gemini::Gemini;
use crate::impls::limiters::sliding_window::SlidingWindow;
use crate::impls::uploaders::local_storage::{LocalStorage, PUBLIC_PREFIX};
use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};
use log::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env();

    let manager = SqliteSqlxManager::connect(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| anyhow!("failed to open database {}: {}", config.database_url, e))?;
    std::fs::create_dir_all(&config.upload_path).with_context(|| format!("failed to create upload directory {}", config.upload_path))?;
    if config.generator_api_key.is_empty() {
        warn!("GENERATOR_API_KEY is not set, question generation will fail");
    }
    let generator = Gemini::new(config.generator_endpoint.as_str(), config.generator_api_key.as_str()).map_err(|e| anyhow!("{}", e))?;

    let manager = Data::new(manager);
    let cache = Data::new(SurveyCache::default());
    let limiter = Data::new(SlidingWindow::new());
    let limits = Data::new(config.limits);
    let uploader = Data::new(LocalStorage::new(config.upload_path.as_str()));
    let generator = Data::new(generator);
    let upload_path = config.upload_path.clone();

    info!("listening on {}:{}", config.bind_addr, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(manager.clone())
            .app_data(cache.clone())
            .app_data(limiter.clone())
            .app_data(limits.clone())
            .app_data(uploader.clone())
            .app_data(generator.clone())
            .service(Files::new(PUBLIC_PREFIX, upload_path.as_str()))
            .configure(handlers::routes::<LocalStorage, Gemini, SlidingWindow>)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
