//! Persistence store
//!
//! SQLite database holding lookup history, favorites, user configuration and
//! scraped prices. Every operation opens its own connection and releases it on return.

pub mod connection;
pub mod favorites;
pub mod history;
pub mod migrations;
pub mod prices;
pub mod settings;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{ConfigEntry, Favorite, HistoryEntry, PriceRecord};

/// Handle to the database file
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create the schema
    pub fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        migrations::run_migrations(&conn)
    }

    fn connect(&self) -> Result<Connection> {
        Ok(connection::create_connection(&self.path)?)
    }

    // history

    pub fn record_lookup(&self, ticker: &str) -> Result<()> {
        history::record_lookup(&self.connect()?, ticker)
    }

    pub fn top_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        history::top_history(&self.connect()?, limit)
    }

    // favorites

    pub fn add_favorite(&self, ticker: &str, name: Option<&str>) -> Result<bool> {
        favorites::add_favorite(&self.connect()?, ticker, name)
    }

    pub fn remove_favorite(&self, ticker: &str) -> Result<bool> {
        favorites::remove_favorite(&self.connect()?, ticker)
    }

    pub fn list_favorites(&self) -> Result<Vec<Favorite>> {
        favorites::list_favorites(&self.connect()?)
    }

    pub fn is_favorite(&self, ticker: &str) -> Result<bool> {
        favorites::is_favorite(&self.connect()?, ticker)
    }

    // configuration

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        settings::set_config(&self.connect()?, key, value)
    }

    pub fn get_config(&self, key: &str, default: Option<String>) -> Result<Option<String>> {
        settings::get_config(&self.connect()?, key, default)
    }

    pub fn list_config(&self) -> Result<Vec<ConfigEntry>> {
        settings::list_config(&self.connect()?)
    }

    // scraped prices

    pub fn insert_price(&self, symbol: &str, price: f64) -> Result<()> {
        prices::insert_price(&self.connect()?, symbol, price)
    }

    pub fn recent_prices(&self, symbol: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        prices::recent_prices(&self.connect()?, symbol, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_roundtrip_across_connections() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("test.db"));
        store.init().unwrap();

        store.record_lookup("PETR4.SA").unwrap();
        store.add_favorite("PETR4.SA", Some("Petrobras")).unwrap();
        store.add_favorite("PETR4.SA", Some("Petrobras")).unwrap();
        store.set_config("k", "v1").unwrap();
        store.set_config("k", "v2").unwrap();

        assert_eq!(store.top_history(10).unwrap()[0].lookups, 1);
        assert_eq!(store.list_favorites().unwrap().len(), 1);
        assert_eq!(store.get_config("k", None).unwrap().as_deref(), Some("v2"));
        assert!(!store.remove_favorite("NOPE3.SA").unwrap());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("missing").join("test.db"));
        assert!(store.init().is_err());
    }
}
