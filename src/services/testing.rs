//! Stub provider for unit tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Fundamentals, Quote};
use crate::services::stock::QuoteProvider;

/// Build a quote whose history ends with a `daily` percent move
pub fn quote_with_daily(symbol: &str, daily: f64) -> Quote {
    let previous = 100.0;
    let current = previous * (1.0 + daily / 100.0);
    Quote {
        symbol: symbol.to_string(),
        name: format!("{} S.A.", symbol),
        currency: Some("BRL".to_string()),
        current_price: current,
        previous_close: Some(previous),
        closes: vec![previous, current],
        fundamentals: Fundamentals::new(),
        fetched_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct StubProvider {
    quotes: HashMap<String, Quote>,
    /// Remaining failures per symbol
    failures: Mutex<HashMap<String, u32>>,
    calls: Mutex<HashMap<String, u32>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.insert(quote.symbol.clone(), quote);
        self
    }

    /// Fail the first `n` calls for `symbol`
    pub fn failing_first(self, symbol: &str, n: u32) -> Self {
        self.failures.lock().unwrap().insert(symbol.to_string(), n);
        self
    }

    pub fn calls(&self, symbol: &str) -> u32 {
        self.calls.lock().unwrap().get(symbol).copied().unwrap_or(0)
    }
}

#[async_trait]
impl QuoteProvider for StubProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        *self.calls.lock().unwrap().entry(symbol.to_string()).or_insert(0) += 1;

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(symbol) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(anyhow!("stub failure for {}", symbol));
                }
            }
        }

        match self.quotes.get(symbol) {
            Some(quote) => Ok(quote.clone()),
            None if symbol.starts_with("MISSING") => Err(anyhow!("unknown symbol {}", symbol)),
            None => Ok(quote_with_daily(symbol, 1.0)),
        }
    }
}
