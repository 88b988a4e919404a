use std::collections::HashSet;

use async_trait::async_trait;

use crate::task::{Task, TaskId};

use super::Result;

/// Local persistent store for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Gets all tasks in display order (local-only first, newest first).
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Gets a task by its ID.
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// Inserts a task, replacing any task with the same ID.
    async fn insert_task(&self, task: &Task) -> Result<()>;

    /// Inserts a batch of tasks atomically, replacing tasks with the same IDs.
    async fn insert_tasks(&self, tasks: &[Task]) -> Result<()>;

    /// Updates an existing task.
    async fn update_task(&self, task: &Task) -> Result<()>;

    /// Deletes a task by its ID.
    async fn delete_task(&self, id: TaskId) -> Result<()>;

    /// Deletes every synced task that has not been edited locally.
    ///
    /// Returns the number of deleted tasks.
    async fn delete_synced_tasks(&self) -> Result<usize>;

    /// Atomically deletes synced, unedited tasks and inserts `tasks` in their place.
    ///
    /// Returns the number of deleted tasks.
    async fn replace_synced_tasks(&self, tasks: &[Task]) -> Result<usize>;

    /// Gets the IDs of synced tasks that were edited locally.
    async fn modified_synced_ids(&self) -> Result<HashSet<TaskId>>;

    /// Allocates the ID for a new local-only task.
    async fn next_local_id(&self) -> Result<TaskId>;
}
