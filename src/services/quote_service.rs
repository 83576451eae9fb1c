//! Dashboard quote service
//!
//! Fetcher behind the result caches: one cache per symbol and one for the whole
//! aggregated watch list. Explicitly constructed and shared through `AppState`.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::Quote;
use crate::services::batch::{self, BatchReport};
use crate::services::cache::ResultCache;
use crate::services::fetcher::{QuoteFetcher, RetryPolicy};
use crate::services::ranker;
use crate::services::stock::QuoteProvider;

const WATCHLIST_KEY: &str = "watchlist";

pub struct QuoteService {
    fetcher: QuoteFetcher,
    /// Per-symbol results, negative ones included
    quotes: ResultCache<String, Option<Quote>>,
    /// Aggregated watch list
    lists: ResultCache<String, BatchReport>,
    workers: usize,
    symbols: Vec<&'static str>,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn QuoteProvider>, config: &AppConfig) -> Self {
        Self::with_symbols(provider, config, batch::watchlist())
    }

    /// Service over a custom watch list
    pub fn with_symbols(
        provider: Arc<dyn QuoteProvider>,
        config: &AppConfig,
        symbols: Vec<&'static str>,
    ) -> Self {
        Self {
            fetcher: QuoteFetcher::new(provider, RetryPolicy::from(&config.fetcher)),
            quotes: ResultCache::new(config.cache.quote_ttl(), config.cache.max_capacity),
            lists: ResultCache::new(config.cache.list_ttl(), 16),
            workers: config.batch.workers,
            symbols,
        }
    }

    /// Quote for one normalised symbol, through the cache
    pub async fn get_quote(&self, symbol: &str) -> Option<Quote> {
        self.quotes
            .get_or_compute(symbol.to_string(), self.fetcher.fetch(symbol))
            .await
    }

    /// Every watch-list symbol, with the ones that returned no data
    pub async fn watchlist_report(&self) -> BatchReport {
        self.lists
            .get_or_compute(
                WATCHLIST_KEY.to_string(),
                batch::fetch_all_report(&self.symbols, self.workers, |symbol| async move {
                    self.get_quote(&symbol).await
                }),
            )
            .await
    }

    /// Watch-list quotes, failed lookups dropped
    pub async fn fetch_all(&self) -> Vec<Quote> {
        self.watchlist_report().await.quotes
    }

    /// Top gainers and losers of the watch list
    pub async fn movers(&self, limit: usize) -> (Vec<Quote>, Vec<Quote>) {
        let quotes = self.fetch_all().await;
        ranker::rank(&quotes, limit)
    }

    /// Manual refresh: forget every cached result
    pub fn clear(&self) {
        self.quotes.clear();
        self.lists.clear();
        log::info!("Quote caches cleared");
    }

    pub fn symbols(&self) -> &[&'static str] {
        &self.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{quote_with_daily, StubProvider};

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.fetcher.base_delay_ms = 1;
        config
    }

    #[tokio::test]
    async fn test_repeated_lookups_hit_provider_once() {
        let provider = Arc::new(StubProvider::new());
        let service = QuoteService::new(provider.clone(), &test_config());

        let first = service.get_quote("PETR4.SA").await.unwrap();
        let second = service.get_quote("PETR4.SA").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls("PETR4.SA"), 1);
    }

    #[tokio::test]
    async fn test_clear_refetches() {
        let provider = Arc::new(StubProvider::new());
        let service = QuoteService::new(provider.clone(), &test_config());

        service.get_quote("VALE3.SA").await;
        service.clear();
        service.get_quote("VALE3.SA").await;

        assert_eq!(provider.calls("VALE3.SA"), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_cached() {
        let provider = Arc::new(StubProvider::new());
        let service = QuoteService::new(provider.clone(), &test_config());

        assert!(service.get_quote("MISSING3.SA").await.is_none());
        assert!(service.get_quote("MISSING3.SA").await.is_none());
        // three attempts on the first lookup, none on the second
        assert_eq!(provider.calls("MISSING3.SA"), 3);
    }

    #[tokio::test]
    async fn test_watchlist_and_movers() {
        let provider = Arc::new(
            StubProvider::new()
                .with_quote(quote_with_daily("UP1.SA", 4.0))
                .with_quote(quote_with_daily("UP2.SA", 2.0))
                .with_quote(quote_with_daily("DOWN1.SA", -6.0)),
        );
        let symbols = vec!["UP1.SA", "UP2.SA", "DOWN1.SA", "MISSING1.SA"];
        let service = QuoteService::with_symbols(provider.clone(), &test_config(), symbols);

        let report = service.watchlist_report().await;
        assert_eq!(report.quotes.len(), 3);
        assert_eq!(report.failed, vec!["MISSING1.SA".to_string()]);

        let (gainers, losers) = service.movers(5).await;
        let gainers: Vec<_> = gainers.iter().map(|q| q.symbol.as_str()).collect();
        let losers: Vec<_> = losers.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(gainers, vec!["UP1.SA", "UP2.SA"]);
        assert_eq!(losers, vec!["DOWN1.SA"]);

        // second pass served from the list cache
        assert_eq!(provider.calls("UP1.SA"), 1);
    }
}
