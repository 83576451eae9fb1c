//! B3 dashboard backend
//!
//! Quotes, fundamentals and top movers for B3 symbols, with lookup history,
//! favorites and user settings in SQLite, and price alerts over AMQP.
//! Data source: Yahoo Finance.

pub mod config;     // configuration
pub mod db;         // SQLite store
pub mod error;      // error types
pub mod handlers;   // HTTP handlers
pub mod middleware; // middleware
pub mod models;     // data model
pub mod services;   // business services
pub mod state;      // shared state
