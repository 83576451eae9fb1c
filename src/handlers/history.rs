//! Lookup history
//!
//! - GET /history?limit=10

use actix_web::{web, HttpResponse, Result};

use super::{blocking, respond};
use crate::models::LimitQuery;
use crate::state::AppState;

pub async fn get_history(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(10);
    let store = state.store.clone();
    Ok(respond(blocking(move || store.top_history(limit)).await))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/history", web::get().to(get_history));
}
