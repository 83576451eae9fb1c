//! Scrape-and-store endpoints
//!
//! - GET /          scrape one price, store it, return `{symbol, price, timestamp}`
//! - GET /history   last 10 stored prices
//!
//! A malformed symbol answers 400, other failures 500, both with `{"error": ...}`.

use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use super::blocking;
use crate::models::{market_time, ScrapeQuery, ScrapeResponse};
use crate::services::stock::{scrape_price, validate_symbol};
use crate::state::AppState;

pub const DEFAULT_SCRAPE_SYMBOL: &str = "AAPL";

/// Requested symbol, `AAPL` when absent, or the 400 response for a malformed one
fn symbol_of(query: &ScrapeQuery) -> std::result::Result<String, HttpResponse> {
    match query.symbol.as_deref().filter(|s| !s.trim().is_empty()) {
        None => Ok(DEFAULT_SCRAPE_SYMBOL.to_string()),
        Some(raw) => validate_symbol(raw).map_err(|e| {
            log::warn!("Rejected scrape symbol {:?}: {}", raw, e);
            HttpResponse::BadRequest().json(json!({"error": "Invalid symbol"}))
        }),
    }
}

pub async fn scrape_and_save(
    state: web::Data<AppState>,
    query: web::Query<ScrapeQuery>,
) -> Result<HttpResponse> {
    let symbol = match symbol_of(&query) {
        Ok(symbol) => symbol,
        Err(response) => return Ok(response),
    };

    let price = match scrape_price(&state.http, &symbol).await {
        Ok(price) => price,
        Err(e) => {
            log::error!("Failed to scrape {}: {}", symbol, e);
            return Ok(HttpResponse::InternalServerError()
                .json(json!({"error": "Could not fetch the price"})));
        }
    };

    let store = state.store.clone();
    let ticker = symbol.clone();
    if let Err(e) = blocking(move || store.insert_price(&ticker, price)).await {
        log::error!("Failed to store price of {}: {}", symbol, e);
        return Ok(HttpResponse::InternalServerError()
            .json(json!({"error": "Could not store the price"})));
    }

    Ok(HttpResponse::Ok().json(ScrapeResponse {
        symbol,
        price,
        timestamp: market_time(),
    }))
}

pub async fn price_history(
    state: web::Data<AppState>,
    query: web::Query<ScrapeQuery>,
) -> Result<HttpResponse> {
    let symbol = match symbol_of(&query) {
        Ok(symbol) => symbol,
        Err(response) => return Ok(response),
    };
    let store = state.store.clone();

    match blocking(move || store.recent_prices(&symbol, 10)).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(rows)),
        Err(e) => {
            log::error!("Failed to read price history: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({"error": "Could not read the price history"})))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(scrape_and_save))
        .route("/history", web::get().to(price_history));
}
