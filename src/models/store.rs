//! Persistence store records

use serde::{Deserialize, Serialize};

/// Lookup count per symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ticker: String,
    pub lookups: i64,
    pub last_lookup: String,
}

/// Favorite asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub ticker: String,
    pub name: Option<String>,
    pub created_at: String,
}

/// User configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: Option<String>,
    pub updated_at: String,
}

/// Scraped price row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub price: f64,
    pub scraped_at: String,
}

/// Body of `POST /favorites`
#[derive(Debug, Deserialize)]
pub struct NewFavorite {
    pub symbol: String,
    pub name: Option<String>,
}

/// Body of `PUT /settings/{key}`
#[derive(Debug, Deserialize)]
pub struct ConfigValue {
    pub value: String,
}

/// `?default=` query of `GET /settings/{key}`
#[derive(Debug, Deserialize)]
pub struct ConfigQuery {
    pub default: Option<String>,
}
