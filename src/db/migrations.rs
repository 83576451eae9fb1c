//! SQLite schema migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_historico_consultas", CREATE_HISTORY_TABLE)?;
    run_migration(conn, "002_configuracoes_usuario", CREATE_CONFIG_TABLE)?;
    run_migration(conn, "003_ativos_favoritos", CREATE_FAVORITES_TABLE)?;
    run_migration(conn, "004_prices", CREATE_PRICES_TABLE)?;

    log::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        log::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_HISTORY_TABLE: &str = r#"
CREATE TABLE historico_consultas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticker TEXT NOT NULL,
    data_consulta TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
CREATE INDEX idx_historico_ticker ON historico_consultas(ticker);
"#;

const CREATE_CONFIG_TABLE: &str = r#"
CREATE TABLE configuracoes_usuario (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chave TEXT NOT NULL UNIQUE,
    valor TEXT,
    data_atualizacao TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
"#;

const CREATE_FAVORITES_TABLE: &str = r#"
CREATE TABLE ativos_favoritos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticker TEXT NOT NULL UNIQUE,
    nome TEXT,
    data_criacao TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
"#;

const CREATE_PRICES_TABLE: &str = r#"
CREATE TABLE prices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    price REAL NOT NULL,
    scraped_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
CREATE INDEX idx_prices_symbol ON prices(symbol, scraped_at);
"#;
