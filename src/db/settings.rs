//! User configuration (`configuracoes_usuario`)

use crate::error::Result;
use crate::models::ConfigEntry;
use rusqlite::{params, Connection, OptionalExtension};

/// Insert or overwrite a key, refreshing its update time
pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO configuracoes_usuario (chave, valor) VALUES (?, ?)
         ON CONFLICT (chave)
         DO UPDATE SET valor = excluded.valor,
                       data_atualizacao = strftime('%Y-%m-%d %H:%M:%f', 'now')",
        params![key, value],
    )?;
    Ok(())
}

/// Stored value, or `default` when the key is absent
pub fn get_config(conn: &Connection, key: &str, default: Option<String>) -> Result<Option<String>> {
    let value: Option<Option<String>> = conn
        .query_row(
            "SELECT valor FROM configuracoes_usuario WHERE chave = ?",
            [key],
            |row| row.get(0),
        )
        .optional()?;

    Ok(match value {
        Some(stored) => stored,
        None => default,
    })
}

pub fn list_config(conn: &Connection) -> Result<Vec<ConfigEntry>> {
    let mut stmt = conn.prepare(
        "SELECT chave, valor, data_atualizacao FROM configuracoes_usuario ORDER BY chave",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(ConfigEntry {
            key: row.get(0)?,
            value: row.get(1)?,
            updated_at: row.get(2)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
