//! Quote data model
//!
//! A `Quote` is built fresh on every provider fetch and never mutated afterwards.
//! Percentage changes are derived from the closing history on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points needed in the closing history for each change window
pub const DAILY_WINDOW: usize = 2;
pub const WEEKLY_WINDOW: usize = 6;
pub const MONTHLY_WINDOW: usize = 21;

/// Fundamental indicators the provider may report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundamentalField {
    MarketCap,
    PriceToBook,
    Beta,
    DividendYield,
    Revenue,
    ProfitMargin,
    Volume,
}

/// Fundamentals reported for a symbol
///
/// A field the provider did not report is absent, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fundamentals(BTreeMap<FundamentalField, f64>);

impl Fundamentals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the value when present and finite
    pub fn set(&mut self, field: FundamentalField, value: Option<f64>) {
        match value {
            Some(v) if v.is_finite() => {
                self.0.insert(field, v);
            }
            _ => {
                self.0.remove(&field);
            }
        }
    }

    pub fn get(&self, field: FundamentalField) -> Option<f64> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One fetched quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Market-suffixed symbol, e.g. `PETR4.SA`
    pub symbol: String,
    /// Display name
    pub name: String,
    pub currency: Option<String>,
    pub current_price: f64,
    /// Prior-session close
    pub previous_close: Option<f64>,
    /// Daily closes, oldest first; the last point is the most recent session
    pub closes: Vec<f64>,
    pub fundamentals: Fundamentals,
    pub fetched_at: DateTime<Utc>,
}

/// Percentage changes over the standard windows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChanges {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

/// `(current - reference) / reference * 100`, 0 when the reference is zero
pub fn percent_change(current: f64, reference: f64) -> f64 {
    if reference == 0.0 || !reference.is_finite() || !current.is_finite() {
        return 0.0;
    }
    (current - reference) / reference * 100.0
}

/// Change between the last point and the point `window - 1` sessions before it
fn window_change(closes: &[f64], window: usize) -> Option<f64> {
    if closes.len() < window {
        return None;
    }
    let current = closes[closes.len() - 1];
    let reference = closes[closes.len() - window];
    Some(percent_change(current, reference))
}

impl PriceChanges {
    /// Derive all windows from a closing history (oldest first)
    ///
    /// Windows without enough points fall back to 0; the yearly change uses the
    /// oldest point available, so a single point yields 0.
    pub fn from_closes(closes: &[f64]) -> Self {
        let yearly = match (closes.first(), closes.last()) {
            (Some(&oldest), Some(&current)) => percent_change(current, oldest),
            _ => 0.0,
        };

        Self {
            daily: window_change(closes, DAILY_WINDOW).unwrap_or(0.0),
            weekly: window_change(closes, WEEKLY_WINDOW).unwrap_or(0.0),
            monthly: window_change(closes, MONTHLY_WINDOW).unwrap_or(0.0),
            yearly,
        }
    }
}

impl Quote {
    /// Daily change, `None` when the history holds fewer than two points
    pub fn daily_change(&self) -> Option<f64> {
        window_change(&self.closes, DAILY_WINDOW)
    }

    pub fn changes(&self) -> PriceChanges {
        PriceChanges::from_closes(&self.closes)
    }

    pub fn snapshot(&self) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            currency: self.currency.clone(),
            current_price: self.current_price,
            previous_close: self.previous_close,
            changes: self.changes(),
            fundamentals: self.fundamentals.clone(),
            fetched_at: self.fetched_at.to_rfc3339(),
        }
    }
}

/// Serialisable view of a quote with derived changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub name: String,
    pub currency: Option<String>,
    pub current_price: f64,
    pub previous_close: Option<f64>,
    pub changes: PriceChanges,
    pub fundamentals: Fundamentals,
    pub fetched_at: String,
}

/// Aggregated watch list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistResponse {
    pub quotes: Vec<QuoteSnapshot>,
    /// Symbols with no data after all retries
    pub failed: Vec<String>,
}

/// Top gainers and losers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoversResponse {
    pub gainers: Vec<QuoteSnapshot>,
    pub losers: Vec<QuoteSnapshot>,
}

/// `?limit=` query
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}
