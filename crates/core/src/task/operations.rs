use std::cmp::Ordering;

use super::error::TaskError;
use super::types::Task;

/// Maximum number of characters allowed in a task title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Validates a task title before creation or update.
pub fn validate_title(title: &str) -> Result<(), TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(TaskError::TitleTooLong);
    }
    Ok(())
}

/// Compares two tasks by display order.
///
/// Local-only tasks come first, then newer tasks, then lower ids.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    b.is_local_only
        .cmp(&a.is_local_only)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts tasks in display order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

/// Finds a task by id.
pub fn find_task(tasks: &[Task], id: i64) -> Option<&Task> {
    tasks.iter().find(|task| task.id == id)
}
