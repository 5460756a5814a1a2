//! Persistence adapter between the joke list and the key-value store.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

use super::types::Joke;
use crate::cache::KvStore;
use crate::error::JokeError;

/// Store key for the cached joke list.
pub const CACHED_JOKES_KEY: &str = "cached_jokes";

/// Reads and writes the joke list under a single store key.
///
/// The stored value is a JSON array of strings; each string is one joke
/// serialized as a JSON object. Every save rewrites the whole list.
#[derive(Clone)]
pub struct JokeCache {
  store: Arc<KvStore>,
}

impl JokeCache {
  pub fn new(store: Arc<KvStore>) -> Self {
    Self { store }
  }

  /// Load every cached joke, in stored order. A missing key is an empty
  /// list. Entries that fail to parse are skipped with a warning so one
  /// corrupt entry cannot wipe the rest of the offline copy.
  pub fn load_all(&self) -> Result<Vec<Joke>, JokeError> {
    let raw = match self.store.get(CACHED_JOKES_KEY)? {
      Some(raw) => raw,
      None => return Ok(Vec::new()),
    };

    let entries: Vec<String> = serde_json::from_str(&raw)?;

    let mut jokes = Vec::with_capacity(entries.len());
    for entry in &entries {
      match Joke::from_cache_entry(entry) {
        Ok(joke) => jokes.push(joke),
        Err(e) => warn!("skipping malformed cache entry: {}", e),
      }
    }

    Ok(jokes)
  }

  /// Overwrite the stored list with a full snapshot of `jokes`.
  pub fn save_all(&self, jokes: &[Joke]) -> Result<(), JokeError> {
    let entries: Vec<String> = jokes.iter().map(Joke::to_cache_entry).collect();
    let raw = serde_json::to_string(&entries)?;
    self.store.put(CACHED_JOKES_KEY, &raw)
  }

  /// When the list was last saved, if ever.
  pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>, JokeError> {
    self.store.saved_at(CACHED_JOKES_KEY)
  }
}
