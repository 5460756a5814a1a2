//! Error types for the joke data flow.
//!
//! Everything here is recovered inside [`crate::jokes::service::JokeService`]
//! and reaches the UI only as a notice string; startup failures use
//! `color_eyre` instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JokeError {
  /// A joke object from the API or the cache is missing a field or has a
  /// non-string field.
  #[error("malformed joke record: {0}")]
  MalformedRecord(String),

  /// Network-level failure: DNS, refused connection, timeout.
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  /// The joke endpoint answered with something other than 200.
  #[error("unexpected HTTP status {0}")]
  Status(u16),

  /// Delete index outside the current list.
  #[error("index {index} out of range for {len} jokes")]
  IndexOutOfRange { index: usize, len: usize },

  /// The underlying key-value store failed.
  #[error("cache store: {0}")]
  Store(#[from] rusqlite::Error),

  /// The cached value under the joke key is not a JSON string array.
  #[error("cache encoding: {0}")]
  Encoding(#[from] serde_json::Error),

  /// Could not create the cache directory or open its files.
  #[error("cache io: {0}")]
  Io(#[from] std::io::Error),

  /// No data directory on this system (no XDG dirs, no home).
  #[error("could not determine a data directory")]
  NoDataDir,

  /// A writer panicked while holding the store lock.
  #[error("cache lock poisoned")]
  LockPoisoned,
}
