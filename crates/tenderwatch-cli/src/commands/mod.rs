//! CLI command modules.

pub mod baseline;
pub mod history;
pub mod ingest;
pub mod validate;

use rusqlite::Connection;

/// Open (creating if needed) and migrate the store at the given path.
pub fn open_store(db: &str) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(parent) = std::path::Path::new(db).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut conn = rusqlite::Connection::open(db)?;
    tenderwatch_store::db::configure(&conn)?;
    tenderwatch_store::migrations::apply_migrations(&mut conn)?;
    Ok(conn)
}
