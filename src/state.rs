//! Shared application state
//!
//! Built once at startup and handed to every handler through `web::Data`.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Store;
use crate::services::alert_service::AlertSink;
use crate::services::quote_service::QuoteService;

pub struct AppState {
    pub quotes: Arc<QuoteService>,
    pub store: Store,
    pub alerts: Arc<dyn AlertSink>,
    /// Client for the scrape endpoints
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        quotes: Arc<QuoteService>,
        store: Store,
        alerts: Arc<dyn AlertSink>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .connect_timeout(config.api.connect_timeout())
            .build()?;

        Ok(Self {
            quotes,
            store,
            alerts,
            http,
        })
    }
}
