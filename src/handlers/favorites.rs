//! Favorite assets
//!
//! - GET    /favorites
//! - POST   /favorites            {symbol, name}
//! - GET    /favorites/{symbol}   whether the symbol is a favorite
//! - DELETE /favorites/{symbol}

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use super::{blocking, error_response, normalize, respond};
use crate::models::NewFavorite;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FavoriteChange {
    pub ticker: String,
    /// Whether a row was inserted or deleted
    pub changed: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub ticker: String,
    pub favorite: bool,
}

pub async fn list_favorites(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.store.clone();
    Ok(respond(blocking(move || store.list_favorites()).await))
}

pub async fn add_favorite(
    state: web::Data<AppState>,
    body: web::Json<NewFavorite>,
) -> Result<HttpResponse> {
    let NewFavorite { symbol, name } = body.into_inner();
    let ticker = match normalize(&symbol) {
        Ok(ticker) => ticker,
        Err(e) => return Ok(error_response(&e)),
    };

    let store = state.store.clone();
    let result = blocking(move || {
        let changed = store.add_favorite(&ticker, name.as_deref())?;
        Ok(FavoriteChange { ticker, changed })
    })
    .await;
    Ok(respond(result))
}

pub async fn favorite_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ticker = match normalize(&path.into_inner()) {
        Ok(ticker) => ticker,
        Err(e) => return Ok(error_response(&e)),
    };

    let store = state.store.clone();
    let result = blocking(move || {
        let favorite = store.is_favorite(&ticker)?;
        Ok(FavoriteStatus { ticker, favorite })
    })
    .await;
    Ok(respond(result))
}

pub async fn remove_favorite(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ticker = match normalize(&path.into_inner()) {
        Ok(ticker) => ticker,
        Err(e) => return Ok(error_response(&e)),
    };

    let store = state.store.clone();
    let result = blocking(move || {
        let changed = store.remove_favorite(&ticker)?;
        Ok(FavoriteChange { ticker, changed })
    })
    .await;
    Ok(respond(result))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("", web::post().to(add_favorite))
            .route("/{symbol}", web::get().to(favorite_status))
            .route("/{symbol}", web::delete().to(remove_favorite)),
    );
}
