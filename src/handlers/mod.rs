pub mod alerts;
pub mod favorites;
pub mod health;
pub mod history;
pub mod quotes;
pub mod scrape;
pub mod settings;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::ApiResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(quotes::config)
            .configure(history::config)
            .configure(favorites::config)
            .configure(settings::config)
            .configure(alerts::config),
    )
    .configure(scrape::config);
}

/// Run store work on the blocking pool
pub(crate) async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f).await?
}

/// Envelope a result
pub(crate) fn respond<T: Serialize>(result: Result<T>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data)),
        Err(e) => error_response(&e),
    }
}

pub(crate) fn error_response(e: &AppError) -> HttpResponse {
    if e.status_code().is_server_error() {
        log::error!("Request failed: {}", e);
    }
    HttpResponse::build(e.status_code()).json(ApiResponse::<()>::error(e.to_string()))
}

/// Normalise a path/body symbol, mapping failures to a 400
pub(crate) fn normalize(raw: &str) -> Result<String> {
    crate::services::stock::normalize_symbol(raw).map_err(|e| AppError::Validation(e.to_string()))
}
