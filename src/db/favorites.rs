//! Favorite assets (`ativos_favoritos`)

use crate::error::Result;
use crate::models::Favorite;
use rusqlite::{params, Connection, OptionalExtension};

/// Add a favorite; an existing ticker is left untouched
///
/// Returns whether a row was inserted.
pub fn add_favorite(conn: &Connection, ticker: &str, name: Option<&str>) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO ativos_favoritos (ticker, nome) VALUES (?, ?)
         ON CONFLICT (ticker) DO NOTHING",
        params![ticker, name],
    )?;
    Ok(inserted > 0)
}

/// Remove a favorite, returns whether a row was deleted
pub fn remove_favorite(conn: &Connection, ticker: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM ativos_favoritos WHERE ticker = ?", [ticker])?;
    Ok(deleted > 0)
}

/// Favorites, newest first
pub fn list_favorites(conn: &Connection) -> Result<Vec<Favorite>> {
    let mut stmt = conn.prepare(
        "SELECT id, ticker, nome, data_criacao FROM ativos_favoritos
         ORDER BY data_criacao DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Favorite {
            id: row.get(0)?,
            ticker: row.get(1)?,
            name: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn is_favorite(conn: &Connection, ticker: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM ativos_favoritos WHERE ticker = ?",
            [ticker],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}
