//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `StoreError` from
//! `todosync_core::storage`.

use todosync_core::storage::StoreError;
use todosync_core::task::TaskId;

const ENTITY: &str = "Task";

/// Maps a rusqlite error to a StoreError.
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` / `SQLITE_CONSTRAINT_UNIQUE` → `AlreadyExists`
/// - `SQLITE_CANTOPEN` → `ConnectionFailed`
/// - `QueryReturnedNoRows` → `NotFound`
/// - row conversion failures → `Serialization`
/// - all other errors → `QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, id: Option<TaskId>) -> StoreError {
    let id_str = || id.map_or_else(|| "unknown".to_string(), |id| id.to_string());
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::AlreadyExists {
                entity_type: ENTITY,
                id: id_str(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            StoreError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
            entity_type: ENTITY,
            id: id_str(),
        },

        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            StoreError::Serialization(err.to_string())
        }

        _ => StoreError::QueryFailed(err.to_string()),
    }
}

fn map_tokio(err: tokio_rusqlite::Error, id: Option<TaskId>) -> StoreError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err, id),
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            StoreError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => StoreError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a StoreError.
pub fn map_store_error(err: tokio_rusqlite::Error) -> StoreError {
    map_tokio(err, None)
}

/// Maps a tokio_rusqlite error for an operation on a known task.
pub fn map_task_error(err: tokio_rusqlite::Error, id: TaskId) -> StoreError {
    map_tokio(err, Some(id))
}
