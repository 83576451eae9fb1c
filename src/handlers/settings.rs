//! User configuration
//!
//! - GET /settings
//! - GET /settings/{key}?default=
//! - PUT /settings/{key}   {value}

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use super::{blocking, error_response, respond};
use crate::error::AppError;
use crate::models::{ConfigQuery, ConfigValue};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConfigPair {
    pub key: String,
    pub value: Option<String>,
}

pub async fn list_settings(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.store.clone();
    Ok(respond(blocking(move || store.list_config()).await))
}

pub async fn get_setting(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ConfigQuery>,
) -> Result<HttpResponse> {
    let key = path.into_inner();
    let default = query.into_inner().default;
    let store = state.store.clone();

    let result = blocking(move || {
        let value = store.get_config(&key, default)?;
        Ok(ConfigPair { key, value })
    })
    .await;
    Ok(respond(result))
}

pub async fn put_setting(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ConfigValue>,
) -> Result<HttpResponse> {
    let key = path.into_inner().trim().to_string();
    if key.is_empty() || key.len() > 50 {
        let e = AppError::Validation("Key must be 1 to 50 characters".to_string());
        return Ok(error_response(&e));
    }

    let value = body.into_inner().value;
    let store = state.store.clone();
    let result = blocking(move || {
        store.set_config(&key, &value)?;
        Ok(ConfigPair {
            key,
            value: Some(value),
        })
    })
    .await;
    Ok(respond(result))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("", web::get().to(list_settings))
            .route("/{key}", web::get().to(get_setting))
            .route("/{key}", web::put().to(put_setting)),
    );
}
