use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::color::DEFAULT_HISTORY;
use crate::models::local_store::COLOR_HISTORY_KEY;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool(path: &str) -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder().max_size(4).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Durable key/value state: profiles, color history, one-shot flags.
        -- Values are JSON documents.
        CREATE TABLE IF NOT EXISTS local_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let history = serde_json::to_string(&DEFAULT_HISTORY)?;
    conn.execute(
        "INSERT OR IGNORE INTO local_store (key, value) VALUES (?1, ?2)",
        params![COLOR_HISTORY_KEY, history],
    )?;

    Ok(())
}
