use rusqlite::{params, OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::DbPool;

pub const PROFILES_KEY: &str = "cta-profiles";
pub const COLOR_HISTORY_KEY: &str = "cta-color-history";
pub const GUIDE_SHOWN_KEY: &str = "cta-guide-shown";

const SELECT_VALUE: &str = "SELECT value FROM local_store WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT INTO local_store (key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP";

/// Durable key/value state that survives restarts. Every value is a JSON
/// document so a key can hold a list as easily as a flag.
pub struct LocalStore;

impl LocalStore {
    /// A missing key is `Ok(None)`. Pool and query failures are errors,
    /// never mistaken for absent data.
    pub fn get(pool: &DbPool, key: &str) -> Result<Option<String>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.query_row(SELECT_VALUE, params![key], |row| row.get(0))
            .optional()
            .map_err(|e| e.to_string())
    }

    pub fn set(pool: &DbPool, key: &str, value: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(UPSERT_VALUE, params![key, value])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Read and decode a JSON value. A value that no longer decodes is an
    /// error so callers can log it.
    pub fn get_json<T: DeserializeOwned>(pool: &DbPool, key: &str) -> Result<Option<T>, String> {
        Self::get(pool, key)?
            .map(|raw| decode(key, &raw))
            .transpose()
    }

    /// Read-modify-write of one JSON value under a write lock, so
    /// concurrent updates to the same key serialize instead of losing
    /// writes. `f` gets the stored value (`None` when absent) and returns
    /// the value to store, or `None` to leave it untouched. Any read,
    /// decode or write failure rolls back and leaves the stored value as
    /// it was.
    pub fn update_json<T, R, F>(pool: &DbPool, key: &str, f: F) -> Result<R, String>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> (Option<T>, R),
    {
        let mut conn = pool.get().map_err(|e| e.to_string())?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| e.to_string())?;

        let raw: Option<String> = tx
            .query_row(SELECT_VALUE, params![key], |row| row.get(0))
            .optional()
            .map_err(|e| e.to_string())?;
        let stored = raw.map(|r| decode(key, &r)).transpose()?;

        let (next, result) = f(stored);
        if let Some(value) = next {
            let raw = serde_json::to_string(&value).map_err(|e| e.to_string())?;
            tx.execute(UPSERT_VALUE, params![key, raw])
                .map_err(|e| e.to_string())?;
        }
        tx.commit().map_err(|e| e.to_string())?;
        Ok(result)
    }

    /// Unreadable flags count as unset.
    pub fn get_flag(pool: &DbPool, key: &str) -> bool {
        match Self::get(pool, key) {
            Ok(v) => v.as_deref() == Some("true"),
            Err(e) => {
                log::error!("Failed to read flag {}: {}", key, e);
                false
            }
        }
    }

    pub fn set_flag(pool: &DbPool, key: &str) -> Result<(), String> {
        Self::set(pool, key, "true")
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| format!("Corrupt value under {}: {}", key, e))
}
