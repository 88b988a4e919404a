use thiserror::Error;

/// Errors that can occur when validating tasks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Task title too long (max 200 characters)")]
    TitleTooLong,
}
