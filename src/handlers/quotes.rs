//! Quote endpoints
//!
//! - GET  /quotes/{symbol}  single quote, recorded in the lookup history
//! - GET  /watchlist        aggregated watch list
//! - GET  /movers?limit=5   top gainers and losers
//! - POST /cache/clear      manual refresh

use actix_web::{web, HttpResponse, Result};

use super::{blocking, error_response, normalize, respond};
use crate::error::AppError;
use crate::models::{ApiResponse, LimitQuery, MoversResponse, WatchlistResponse};
use crate::services::ranker::DEFAULT_MOVERS;
use crate::state::AppState;

pub async fn get_quote(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = match normalize(&path.into_inner()) {
        Ok(symbol) => symbol,
        Err(e) => return Ok(error_response(&e)),
    };

    let quote = match state.quotes.get_quote(&symbol).await {
        Some(quote) => quote,
        None => {
            let e = AppError::NotFound(format!("No data for {}", symbol));
            return Ok(error_response(&e));
        }
    };

    // A history failure must not hide the quote
    let store = state.store.clone();
    let ticker = symbol.clone();
    if let Err(e) = blocking(move || store.record_lookup(&ticker)).await {
        log::error!("Failed to record lookup of {}: {}", symbol, e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(quote.snapshot())))
}

pub async fn get_watchlist(state: web::Data<AppState>) -> Result<HttpResponse> {
    let report = state.quotes.watchlist_report().await;
    let response = WatchlistResponse {
        quotes: report.quotes.iter().map(|q| q.snapshot()).collect(),
        failed: report.failed,
    };
    Ok(respond(Ok(response)))
}

pub async fn get_movers(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_MOVERS);
    let (gainers, losers) = state.quotes.movers(limit).await;
    let response = MoversResponse {
        gainers: gainers.iter().map(|q| q.snapshot()).collect(),
        losers: losers.iter().map(|q| q.snapshot()).collect(),
    };
    Ok(respond(Ok(response)))
}

pub async fn clear_cache(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.quotes.clear();
    Ok(respond(Ok("Cache cleared")))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/quotes/{symbol}", web::get().to(get_quote))
        .route("/watchlist", web::get().to(get_watchlist))
        .route("/movers", web::get().to(get_movers))
        .route("/cache/clear", web::post().to(clear_cache));
}
