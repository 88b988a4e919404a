//! Top-level error type for repository and use-case operations.

use thiserror::Error;

use crate::remote::RemoteError;
use crate::storage::StoreError;
use crate::task::{TaskError, TaskId};

/// Errors surfaced by [`TaskRepository`](crate::repository::TaskRepository)
/// and [`TaskService`](crate::usecases::TaskService).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] TaskError),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
}

impl Error {
    /// Returns true if the error means the task does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::TaskNotFound(_) => true,
            Error::Storage(err) => err.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for repository and use-case operations.
pub type Result<T> = std::result::Result<T, Error>;
