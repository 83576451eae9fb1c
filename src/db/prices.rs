//! Scraped prices (`prices`)

use crate::error::Result;
use crate::models::PriceRecord;
use rusqlite::{params, Connection};

pub fn insert_price(conn: &Connection, symbol: &str, price: f64) -> Result<()> {
    conn.execute(
        "INSERT INTO prices (symbol, price) VALUES (?, ?)",
        params![symbol, price],
    )?;
    Ok(())
}

/// Latest rows for a symbol, newest first
pub fn recent_prices(conn: &Connection, symbol: &str, limit: usize) -> Result<Vec<PriceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT price, scraped_at FROM prices WHERE symbol = ?
         ORDER BY scraped_at DESC, id DESC LIMIT ?",
    )?;

    let rows = stmt.query_map(params![symbol, limit as i64], |row| {
        Ok(PriceRecord {
            price: row.get(0)?,
            scraped_at: row.get(1)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
