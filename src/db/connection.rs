//! SQLite connection utilities

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Open a new SQLite connection
pub fn create_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(conn)
}
