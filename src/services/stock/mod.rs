//! Quote data providers
//!
//! `QuoteProvider` is the seam between the fetcher and the external data source,
//! tests plug a stub in its place.

pub mod scrape;
pub mod yahoo;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use crate::models::Quote;

pub use scrape::scrape_price;
pub use yahoo::YahooProvider;

/// Suffix of B3-listed symbols on the provider
pub const B3_SUFFIX: &str = ".SA";

/// Source of quote data for a single symbol
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch current price, closing history and fundamentals
    ///
    /// Any failure is an error; the fetcher decides whether to retry.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote>;
}

fn symbol_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z0-9^=\-]{1,12}(\.[A-Z]{1,3})?$").expect("symbol regex is valid")
    })
}

/// Trim and upper-case a symbol, rejecting anything outside the ticker alphabet
///
/// No market suffix is added: `aapl` stays `AAPL`.
pub fn validate_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(anyhow!("Empty symbol"));
    }
    if !symbol_regex().is_match(&symbol) {
        return Err(anyhow!("Invalid symbol: {}", raw.trim()));
    }
    Ok(symbol)
}

/// Normalise a user-supplied symbol
///
/// `petr4` becomes `PETR4.SA`; symbols that already carry a market suffix or are
/// index/FX codes (`^BVSP`, `BRL=X`) are kept as they are.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = validate_symbol(raw)?;

    if symbol.contains('.') || symbol.starts_with('^') || symbol.contains('=') || symbol.contains('-') {
        Ok(symbol)
    } else {
        Ok(format!("{}{}", symbol, B3_SUFFIX))
    }
}
