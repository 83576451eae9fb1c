//! Lookup history (`historico_consultas`)

use crate::error::Result;
use crate::models::HistoryEntry;
use rusqlite::{params, Connection};

/// Append one lookup
pub fn record_lookup(conn: &Connection, ticker: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO historico_consultas (ticker) VALUES (?)",
        [ticker],
    )?;
    Ok(())
}

/// Most looked-up symbols, by count then most recent lookup
pub fn top_history(conn: &Connection, limit: usize) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT ticker, COUNT(*) AS consultas, MAX(data_consulta) AS ultima_consulta
         FROM historico_consultas
         GROUP BY ticker
         ORDER BY consultas DESC, ultima_consulta DESC, MAX(id) DESC
         LIMIT ?",
    )?;

    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(HistoryEntry {
            ticker: row.get(0)?,
            lookups: row.get(1)?,
            last_lookup: row.get(2)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
