//! Local persistence for offline use.
//!
//! A single SQLite database with one key-value table. The joke list lives
//! under one fixed key as a full snapshot of the in-memory list (never a
//! delta), so whatever was on screen last is what comes back after a
//! restart.

mod store;

pub use store::KvStore;
