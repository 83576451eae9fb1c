//! Watch list aggregation
//!
//! Fans fetches out over a bounded number of concurrent tasks. Output follows
//! completion order; symbols without data are dropped from `quotes` and reported in `failed`.

use futures::stream::{self, StreamExt};
use std::future::Future;

use crate::models::Quote;

/// B3 stocks on the dashboard
pub const WATCHLIST_STOCKS: &[&str] = &[
    "PETR4.SA", "VALE3.SA", "ITUB4.SA", "BBDC4.SA", "BBAS3.SA",
    "ABEV3.SA", "WEGE3.SA", "B3SA3.SA", "RENT3.SA", "SUZB3.SA",
    "GGBR4.SA", "JBSS3.SA", "RADL3.SA", "LREN3.SA", "PRIO3.SA",
    "ELET3.SA", "EQTL3.SA", "RAIL3.SA", "HAPV3.SA", "MGLU3.SA",
];

/// Real-estate funds (FIIs) on the dashboard
pub const WATCHLIST_FIIS: &[&str] = &[
    "HGLG11.SA", "KNRI11.SA", "MXRF11.SA", "XPML11.SA", "VISC11.SA",
    "HGRU11.SA", "BCFF11.SA", "KNCR11.SA", "XPLG11.SA",
];

/// Full compiled-in watch list
pub fn watchlist() -> Vec<&'static str> {
    WATCHLIST_STOCKS.iter().chain(WATCHLIST_FIIS).copied().collect()
}

/// Result of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub quotes: Vec<Quote>,
    pub failed: Vec<String>,
}

/// Run `fetch` over every symbol with at most `workers` in flight
pub async fn fetch_all_report<F, Fut>(symbols: &[&str], workers: usize, fetch: F) -> BatchReport
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<Quote>>,
{
    let results: Vec<(String, Option<Quote>)> = stream::iter(symbols.iter().map(|s| s.to_string()))
        .map(|symbol| {
            let fut = fetch(symbol.clone());
            async move { (symbol, fut.await) }
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    let mut report = BatchReport::default();
    for (symbol, quote) in results {
        match quote {
            Some(quote) => report.quotes.push(quote),
            None => report.failed.push(symbol),
        }
    }

    if !report.failed.is_empty() {
        log::warn!(
            "Batch fetch: {} of {} symbols returned no data: {:?}",
            report.failed.len(),
            symbols.len(),
            report.failed
        );
    }
    report
}

/// Quotes only, failed lookups dropped
pub async fn fetch_all<F, Fut>(symbols: &[&str], workers: usize, fetch: F) -> Vec<Quote>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<Quote>>,
{
    fetch_all_report(symbols, workers, fetch).await.quotes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::quote_with_daily;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_watchlist_size() {
        let list = watchlist();
        assert_eq!(list.len(), 29);
        let unique: HashSet<_> = list.iter().collect();
        assert_eq!(unique.len(), list.len());
        assert!(list.iter().all(|s| s.ends_with(".SA")));
    }

    #[tokio::test]
    async fn test_failed_symbols_are_dropped() {
        let symbols = ["PETR4.SA", "MISSING.SA", "VALE3.SA"];
        let report = fetch_all_report(&symbols, 4, |symbol| async move {
            if symbol.starts_with("MISSING") {
                None
            } else {
                Some(quote_with_daily(&symbol, 1.0))
            }
        })
        .await;

        let got: HashSet<_> = report.quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(got, HashSet::from(["PETR4.SA", "VALE3.SA"]));
        assert_eq!(report.failed, vec!["MISSING.SA".to_string()]);

        let quotes = fetch_all(&symbols, 4, |symbol| async move {
            (!symbol.starts_with("MISSING")).then(|| quote_with_daily(&symbol, 1.0))
        })
        .await;
        assert_eq!(quotes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let symbols = watchlist();

        let quotes = fetch_all(&symbols, 8, |symbol| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Some(quote_with_daily(&symbol, 0.5))
            }
        })
        .await;

        assert_eq!(quotes.len(), 29);
        assert_eq!(peak.load(Ordering::SeqCst), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_follows_completion_order() {
        let symbols = ["SLOW3.SA", "FAST3.SA"];
        let quotes = fetch_all(&symbols, 2, |symbol| async move {
            let wait = if symbol.starts_with("SLOW") { 50 } else { 5 };
            tokio::time::sleep(Duration::from_millis(wait)).await;
            Some(quote_with_daily(&symbol, 1.0))
        })
        .await;

        let order: Vec<_> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(order, vec!["FAST3.SA", "SLOW3.SA"]);
    }
}
