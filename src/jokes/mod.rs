//! Joke domain: the record type, the API client, the persistence adapter
//! and the service that ties them together.

pub mod cache;
pub mod client;
pub mod service;
pub mod types;
