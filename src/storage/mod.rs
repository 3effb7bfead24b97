//! Persistence layer
//!
//! Sled-backed history of analysis outcomes. Storage is an optional
//! capability: when the database cannot be opened at startup the API runs
//! without history and `GET /api/v1/history` returns an empty list.

mod history;

pub use history::{HistoryEntry, HistoryStorage, StorageError};
