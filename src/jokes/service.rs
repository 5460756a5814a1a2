//! The joke service: owns the list and orchestrates connectivity, fetch,
//! cache and deletion. The UI never mutates anything here directly; it
//! spawns calls into this service and renders the snapshots that come back
//! over the event channel.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use super::cache::JokeCache;
use super::client::JokeClient;
use super::types::Joke;
use crate::error::JokeError;
use crate::net::Connectivity;

/// How many jokes are kept, in memory and on disk. The length check and the
/// truncation both use this one value.
pub const DEFAULT_MAX_JOKES: usize = 5;

/// User-facing notice strings. Failures never carry structured errors past
/// this module.
pub const NOTICE_OFFLINE: &str = "no connection, showing cached jokes";
pub const NOTICE_FETCH_FAILED: &str = "unable to fetch jokes";
pub const NOTICE_OP_IN_FLIGHT: &str = "another operation in progress";
pub const NOTICE_BAD_DELETE: &str = "nothing to delete there";

/// What the service tells the presentation layer.
#[derive(Debug, Clone)]
pub enum ServiceEvent {
  /// Read-only snapshot of current state.
  State(ListSnapshot),
  /// Fire-and-forget notice for the status bar.
  Notice(String),
}

/// Read-only view of service state for rendering.
#[derive(Debug, Clone, Default)]
pub struct ListSnapshot {
  pub jokes: Vec<Joke>,
  pub is_loading: bool,
  pub is_online: bool,
  /// When the cache was last written, for the header. Cosmetic.
  pub cache_saved_at: Option<DateTime<Utc>>,
}

struct ServiceState {
  jokes: Vec<Joke>,
  is_loading: bool,
  is_online: bool,
}

struct Inner {
  client: JokeClient,
  cache: JokeCache,
  connectivity: Arc<dyn Connectivity>,
  max_jokes: usize,
  /// Guarded state. Held only for non-awaiting critical sections.
  state: Mutex<ServiceState>,
  /// Serializes logical operations: fetch rejects when taken, delete and
  /// initialize queue.
  op_guard: tokio::sync::Mutex<()>,
  event_tx: UnboundedSender<ServiceEvent>,
}

/// Owns the joke list and the loading/online flags.
#[derive(Clone)]
pub struct JokeService {
  inner: Arc<Inner>,
}

impl JokeService {
  pub fn new(
    client: JokeClient,
    cache: JokeCache,
    connectivity: Arc<dyn Connectivity>,
    max_jokes: usize,
    event_tx: UnboundedSender<ServiceEvent>,
  ) -> Self {
    Self {
      inner: Arc::new(Inner {
        client,
        cache,
        connectivity,
        max_jokes,
        state: Mutex::new(ServiceState {
          jokes: Vec::new(),
          is_loading: false,
          is_online: false,
        }),
        op_guard: tokio::sync::Mutex::new(()),
        event_tx,
      }),
    }
  }

  /// Seed the list from the cache, then probe connectivity once.
  pub async fn initialize(&self) {
    let _guard = self.inner.op_guard.lock().await;

    match self.inner.cache.load_all() {
      Ok(mut jokes) => {
        // The cap may have been lowered since the cache was written
        jokes.truncate(self.inner.max_jokes);
        self.lock_state().jokes = jokes;
      }
      Err(e) => warn!("could not load cached jokes: {}", e),
    }
    self.emit_state();

    let online = self.inner.connectivity.has_connection().await;
    self.lock_state().is_online = online;
    self.emit_state();
  }

  /// Point-in-time probe; sets the online flag. The answer is already stale
  /// by the time anyone reads it, which is fine.
  pub async fn check_connectivity(&self) -> bool {
    let online = self.inner.connectivity.has_connection().await;
    self.lock_state().is_online = online;
    self.emit_state();
    online
  }

  /// One best-effort fetch: connectivity gate, one GET, prepend, truncate,
  /// persist. Rejects with a notice rather than queueing when another
  /// operation holds the guard. No retries.
  pub async fn fetch_joke(&self) {
    let _guard = match self.inner.op_guard.try_lock() {
      Ok(guard) => guard,
      Err(_) => {
        self.notify(NOTICE_OP_IN_FLIGHT);
        return;
      }
    };

    self.set_loading(true);

    let online = self.lock_state().is_online;
    if !online {
      self.notify(NOTICE_OFFLINE);
      self.set_loading(false);
      return;
    }

    match self.inner.client.random_joke().await {
      Ok(joke) => {
        let jokes = {
          let mut state = self.lock_state();
          state.jokes.insert(0, joke);
          state.jokes.truncate(self.inner.max_jokes);
          state.jokes.clone()
        };
        self.emit_state();
        self.persist(&jokes);
      }
      Err(e) => {
        warn!("fetch failed: {}", e);
        self.notify(NOTICE_FETCH_FAILED);
      }
    }

    self.set_loading(false);
  }

  /// Remove the entry at `index` and persist the shorter list. Queues
  /// behind an in-flight fetch. An out-of-range index leaves the list and
  /// the store unchanged.
  pub async fn delete_joke(&self, index: usize) {
    let _guard = self.inner.op_guard.lock().await;

    let removed = {
      let mut state = self.lock_state();
      let len = state.jokes.len();
      if index >= len {
        Err(JokeError::IndexOutOfRange { index, len })
      } else {
        state.jokes.remove(index);
        Ok(state.jokes.clone())
      }
    };

    match removed {
      Ok(jokes) => {
        self.emit_state();
        self.persist(&jokes);
      }
      Err(e) => {
        warn!("delete rejected: {}", e);
        self.notify(NOTICE_BAD_DELETE);
      }
    }
  }

  /// Cloned state for the presentation layer.
  pub fn snapshot(&self) -> ListSnapshot {
    let (jokes, is_loading, is_online) = {
      let state = self.lock_state();
      (state.jokes.clone(), state.is_loading, state.is_online)
    };
    ListSnapshot {
      jokes,
      is_loading,
      is_online,
      cache_saved_at: self.inner.cache.saved_at().ok().flatten(),
    }
  }

  pub fn max_jokes(&self) -> usize {
    self.inner.max_jokes
  }

  /// Write the full list snapshot. The in-memory list stays authoritative
  /// when the durable copy lags, so a failed write is only logged.
  fn persist(&self, jokes: &[Joke]) {
    if let Err(e) = self.inner.cache.save_all(jokes) {
      warn!("cache write failed: {}", e);
    }
  }

  fn set_loading(&self, loading: bool) {
    self.lock_state().is_loading = loading;
    self.emit_state();
  }

  fn lock_state(&self) -> MutexGuard<'_, ServiceState> {
    // A poisoning panic cannot leave the state half-mutated; recover it.
    self.inner.state.lock().unwrap_or_else(|p| p.into_inner())
  }

  fn emit_state(&self) {
    let _ = self.inner.event_tx.send(ServiceEvent::State(self.snapshot()));
  }

  fn notify(&self, notice: &str) {
    let _ = self
      .inner
      .event_tx
      .send(ServiceEvent::Notice(notice.to_string()));
  }
}
