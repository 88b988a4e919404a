//! todosync - to-do list synced from a remote task API into a local store.

pub mod app;
pub mod cli;
pub mod config;
pub mod output;
pub mod remote;
pub mod repository;
pub mod state;
pub mod storage;

pub use config::Config;
pub use repository::{SyncOptions, SyncedTaskRepository};
pub use state::{TaskListModel, UiState};
