use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::task::{NewTask, Photo, SyncReport, Task, TaskId};

/// Repository reconciling the remote task API, the photo API and the local store.
///
/// Reads never touch the network; only [`TaskRepository::refresh`] and
/// [`TaskRepository::get_photos`] do.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Gets all tasks from the local store in display order.
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Gets a task from the local store.
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// Subscribes to the task list. A new value is published after every
    /// local mutation.
    fn watch_tasks(&self) -> watch::Receiver<Vec<Task>>;

    /// Replaces synced tasks with the current remote tasks and saves them locally.
    async fn refresh(&self) -> Result<SyncReport>;

    /// Stores a new local-only task.
    async fn add_task(&self, task: NewTask) -> Result<Task>;

    /// Persists changes to an existing task and marks it modified.
    async fn update_task(&self, task: &Task) -> Result<Task>;

    /// Deletes a task from the local store.
    async fn delete_task(&self, id: TaskId) -> Result<()>;

    /// Fetches random photos for the photo picker.
    async fn get_photos(&self, count: usize) -> Result<Vec<Photo>>;
}
