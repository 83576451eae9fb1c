//! API response envelope
//!
//! Every `/api/v1` endpoint answers with the same shape.

use chrono::Utc;
use chrono_tz::America::Sao_Paulo;
use serde::{Deserialize, Serialize};

/// Current time in the B3 market zone (ISO 8601)
pub fn market_time() -> String {
    Utc::now().with_timezone(&Sao_Paulo).to_rfc3339()
}

/// Uniform API response
///
/// - success: whether the request succeeded
/// - data: payload on success
/// - message: human-readable status
/// - timestamp: response time in the market zone
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Success response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: market_time(),
        }
    }

    /// Error response
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: market_time(),
        }
    }
}

/// Payload of the scrape endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub symbol: String,
    pub price: f64,
    pub timestamp: String,
}

/// `?symbol=` query of the scrape endpoints
#[derive(Debug, Deserialize)]
pub struct ScrapeQuery {
    pub symbol: Option<String>,
}
