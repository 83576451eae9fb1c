//! Shared fixtures for the HTTP tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use b3_dashboard::config::AppConfig;
use b3_dashboard::db::Store;
use b3_dashboard::error::Result as AppResult;
use b3_dashboard::models::{AlertMessage, Fundamentals, Quote};
use b3_dashboard::services::alert_service::AlertSink;
use b3_dashboard::services::quote_service::QuoteService;
use b3_dashboard::services::stock::QuoteProvider;
use b3_dashboard::state::AppState;

/// Quote with a two-point history ending in a `daily` percent move
pub fn quote(symbol: &str, previous: f64, daily: f64) -> Quote {
    let current = previous * (1.0 + daily / 100.0);
    Quote {
        symbol: symbol.to_string(),
        name: format!("{} S.A.", symbol.trim_end_matches(".SA")),
        currency: Some("BRL".to_string()),
        current_price: current,
        previous_close: Some(previous),
        closes: vec![previous, current],
        fundamentals: Fundamentals::new(),
        fetched_at: Utc::now(),
    }
}

/// Provider serving fixed quotes and counting calls
#[derive(Default)]
pub struct MockProvider {
    quotes: HashMap<String, Quote>,
    calls: Mutex<HashMap<String, u32>>,
}

impl MockProvider {
    pub fn with(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: quotes.into_iter().map(|q| (q.symbol.clone(), q)).collect(),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self, symbol: &str) -> u32 {
        self.calls.lock().unwrap().get(symbol).copied().unwrap_or(0)
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        *self.calls.lock().unwrap().entry(symbol.to_string()).or_insert(0) += 1;
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow!("unknown symbol {}", symbol))
    }
}

/// Alert sink keeping messages in memory
#[derive(Default)]
pub struct MemorySink {
    pub sent: Mutex<Vec<AlertMessage>>,
}

#[async_trait]
impl AlertSink for MemorySink {
    async fn publish(&self, message: &AlertMessage) -> AppResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub provider: Arc<MockProvider>,
    pub sink: Arc<MemorySink>,
    // keeps the database file alive
    pub _dir: TempDir,
}

pub fn context(symbols: Vec<&'static str>, quotes: Vec<Quote>) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.fetcher.base_delay_ms = 1;
    config.store.path = dir.path().join("test.db").to_string_lossy().to_string();

    let store = Store::new(&config.store.path);
    store.init().unwrap();

    let provider = Arc::new(MockProvider::with(quotes));
    let sink = Arc::new(MemorySink::default());
    let service = QuoteService::with_symbols(provider.clone(), &config, symbols);

    let state = AppState::new(&config, Arc::new(service), store, sink.clone()).unwrap();

    TestContext {
        state,
        provider,
        sink,
        _dir: dir,
    }
}
