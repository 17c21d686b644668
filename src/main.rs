// src/main.rs
mod config;
mod models;
mod handlers;
mod storage;
mod query;
mod poller;
mod utils;

use actix_web::{ web, App, HttpServer };
use env_logger::Env;
use storage::memory::StatusStorage;
use crate::config::Config;
use crate::utils::IpRateLimiter;
use log::{info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind = format!("{}:{}", bind_address, port);

    if config.targets.is_empty() {
        warn!("No valid query targets configured, status lists will stay empty");
    }
    for target in &config.targets {
        info!("Polling {} every {}s", target, config.poll_interval().as_secs());
    }

    let storage = web::Data::new(StatusStorage::new());
    let status_rate_limiter = web::Data::new(IpRateLimiter::keyed(config.status_quota()));

    tokio::spawn(poller::run(config.clone(), storage.clone()));

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(storage.clone())
            .app_data(status_rate_limiter.clone())
            .route("/", web::get().to(handlers::index::index))
            .route("/servers", web::get().to(handlers::servers::get_servers))
            .route("/servers/summary", web::get().to(handlers::servers::get_summary))
            .route("/servers/{target}", web::get().to(handlers::servers::get_server))
    })
        .bind(&bind)?
        .run().await
}
