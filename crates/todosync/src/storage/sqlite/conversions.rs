//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use rusqlite::Row;

use todosync_core::task::Task;

/// Convert a SQLite row to a Task.
///
/// Expected columns: id, title, completed, image_url, is_local_only, is_modified, created_at
pub fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let title: String = row.get(1)?;
    let completed: bool = row.get(2)?;
    let image_url: Option<String> = row.get(3)?;
    let is_local_only: bool = row.get(4)?;
    let is_modified: bool = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Task {
        id,
        title,
        completed,
        image_url,
        is_local_only,
        is_modified,
        created_at: parse_datetime(6, &created_at)?,
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
///
/// Fixed-width with nanoseconds so that text ordering matches time ordering.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}
