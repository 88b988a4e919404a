//! Local storage backend.
//!
//! Implements [`TaskStore`](todosync_core::storage::TaskStore) on SQLite using
//! `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.

pub mod sqlite;

pub use sqlite::SqliteTaskStore;
