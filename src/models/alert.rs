//! Price alert messages

use serde::{Deserialize, Serialize};

/// Target-price-reached event carried over the broker queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub ticker: String,
    pub target_price: f64,
    pub current_price: f64,
}

impl AlertMessage {
    /// Line printed by the worker for each received alert
    pub fn describe(&self) -> String {
        format!(
            "Alert: {} reached the target price of {:.2}! Current price: {:.2}",
            self.ticker, self.target_price, self.current_price
        )
    }
}

/// Body of `POST /alerts`
#[derive(Debug, Deserialize)]
pub struct AlertRequest {
    pub ticker: String,
    pub target_price: f64,
}

/// Outcome of an alert check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertOutcome {
    pub ticker: String,
    pub target_price: f64,
    pub current_price: f64,
    /// Whether a message was handed to the broker
    pub published: bool,
}
