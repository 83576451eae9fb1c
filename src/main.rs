//! B3 dashboard HTTP service

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::sync::Arc;

use b3_dashboard::config::AppConfig;
use b3_dashboard::db::Store;
use b3_dashboard::handlers;
use b3_dashboard::middleware::ApiKeyMiddleware;
use b3_dashboard::services::alert_service::AmqpPublisher;
use b3_dashboard::services::quote_service::QuoteService;
use b3_dashboard::services::stock::YahooProvider;
use b3_dashboard::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let (config, report) = AppConfig::load();

    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));
    report.log();

    if config.api.api_key.is_empty() {
        log::warn!("API_KEY not set, authentication disabled");
    }

    let store = Store::new(&config.store.path);
    if let Err(e) = store.init() {
        // The dashboard still serves quotes without the store
        log::error!("Database initialisation failed ({}): {}", config.store.path, e);
    }

    let provider = YahooProvider::new(&config).map_err(std::io::Error::other)?;
    let quotes = Arc::new(QuoteService::new(Arc::new(provider), &config));
    let alerts = Arc::new(AmqpPublisher::new(config.broker.clone()));

    let bind_addr = config.bind_addr();
    let workers = config.server.workers;
    let api_key = config.api.api_key.clone();

    let state = AppState::new(&config, quotes, store, alerts).map_err(std::io::Error::other)?;
    let state = web::Data::new(state);

    log::info!("Starting B3 dashboard on {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ApiKeyMiddleware::new(api_key.clone()))
            .wrap(Logger::default())
            .configure(handlers::config)
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server.bind(bind_addr)?.run().await
}
