//! Business services
//!
//! Quote fetching, caching, aggregation, ranking and alerts

pub mod alert_service;   // broker publisher / consumer
pub mod batch;           // watch-list aggregation
pub mod cache;           // TTL result cache
pub mod fetcher;         // retrying quote fetcher
pub mod quote_service;   // cached dashboard facade
pub mod ranker;          // top movers
pub mod stock;           // data providers

#[cfg(test)]
pub(crate) mod testing;
