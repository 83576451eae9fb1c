//! Price alerts
//!
//! - POST /alerts   {ticker, target_price}

use actix_web::{web, HttpResponse, Result};

use super::{error_response, normalize, respond};
use crate::models::AlertRequest;
use crate::services::alert_service;
use crate::state::AppState;

pub async fn create_alert(
    state: web::Data<AppState>,
    body: web::Json<AlertRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let symbol = match normalize(&request.ticker) {
        Ok(symbol) => symbol,
        Err(e) => return Ok(error_response(&e)),
    };

    let outcome = alert_service::check_and_publish(
        &state.quotes,
        state.alerts.as_ref(),
        &symbol,
        request.target_price,
    )
    .await;
    Ok(respond(outcome))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/alerts", web::post().to(create_alert));
}
