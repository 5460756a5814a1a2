//! SQLite-backed key-value store.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::JokeError;

/// Schema for the key-value table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_cache (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Key-value store over a single SQLite table.
///
/// There is one writer (the joke service); the connection sits behind a
/// mutex held only for the duration of a statement.
pub struct KvStore {
  conn: Mutex<Connection>,
}

impl KvStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self, JokeError> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the store at an explicit path, creating parent
  /// directories as needed.
  pub fn open_at(path: &Path) -> Result<Self, JokeError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;

    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf, JokeError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or(JokeError::NoDataDir)?;

    Ok(data_dir.join("jokebox").join("cache.db"))
  }

  fn run_migrations(&self) -> Result<(), JokeError> {
    let conn = self.lock()?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, JokeError> {
    self.conn.lock().map_err(|_| JokeError::LockPoisoned)
  }

  /// Read the value under `key`, if present.
  pub fn get(&self, key: &str) -> Result<Option<String>, JokeError> {
    let conn = self.lock()?;
    let value = conn
      .query_row("SELECT value FROM kv_cache WHERE key = ?", params![key], |row| {
        row.get(0)
      })
      .optional()?;
    Ok(value)
  }

  /// Overwrite the value under `key`. Last writer wins.
  pub fn put(&self, key: &str, value: &str) -> Result<(), JokeError> {
    let conn = self.lock()?;
    conn.execute(
      "INSERT OR REPLACE INTO kv_cache (key, value, saved_at) VALUES (?, ?, datetime('now'))",
      params![key, value],
    )?;
    Ok(())
  }

  /// When `key` was last written, if ever.
  pub fn saved_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, JokeError> {
    let conn = self.lock()?;
    let ts: Option<String> = conn
      .query_row(
        "SELECT saved_at FROM kv_cache WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(ts.as_deref().and_then(parse_datetime))
  }
}

/// Parse a datetime string from SQLite format ("YYYY-MM-DD HH:MM:SS").
/// Unreadable timestamps degrade to `None` with a warning; the value is
/// only shown in the header.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
  match chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
    Ok(dt) => Some(dt.and_utc()),
    Err(e) => {
      tracing::warn!("unreadable saved_at timestamp '{}': {}", s, e);
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_store() -> (tempfile::TempDir, KvStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = KvStore::open_at(&dir.path().join("cache.db")).unwrap();
    (dir, store)
  }

  #[test]
  fn test_missing_key_is_none() {
    let (_dir, store) = temp_store();
    assert_eq!(store.get("nope").unwrap(), None);
    assert_eq!(store.saved_at("nope").unwrap(), None);
  }

  #[test]
  fn test_put_then_get() {
    let (_dir, store) = temp_store();
    store.put("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
  }

  #[test]
  fn test_put_overwrites() {
    let (_dir, store) = temp_store();
    store.put("k", "first").unwrap();
    store.put("k", "second").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
  }

  #[test]
  fn test_saved_at_tracks_writes() {
    let (_dir, store) = temp_store();
    store.put("k", "v").unwrap();
    assert!(store.saved_at("k").unwrap().is_some());
  }

  #[test]
  fn test_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    {
      let store = KvStore::open_at(&path).unwrap();
      store.put("k", "v").unwrap();
    }
    let store = KvStore::open_at(&path).unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
  }

  #[test]
  fn test_parse_datetime() {
    assert!(parse_datetime("2024-06-01 12:30:00").is_some());
    assert!(parse_datetime("garbage").is_none());
  }
}
