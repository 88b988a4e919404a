//! Use-case facade over a [`TaskRepository`].
//!
//! Input validation lives here so every front end gets the same rules.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::photo::DEFAULT_PICKER_PHOTO_COUNT;
use crate::repository::TaskRepository;
use crate::task::{NewTask, Photo, SyncReport, Task, TaskId, UpdateTaskRequest};

/// Task operations offered to the presentation layer.
pub struct TaskService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository + ?Sized> TaskService<R> {
    /// Creates a service backed by the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists tasks from the local store.
    pub async fn tasks(&self) -> Result<Vec<Task>> {
        self.repository.get_tasks().await
    }

    /// Subscribes to the task list.
    pub fn watch(&self) -> watch::Receiver<Vec<Task>> {
        self.repository.watch_tasks()
    }

    /// Synchronizes tasks from the remote API.
    pub async fn refresh(&self) -> Result<SyncReport> {
        self.repository.refresh().await
    }

    /// Creates a local-only task.
    pub async fn add_task(&self, title: &str, image_url: Option<String>) -> Result<Task> {
        let mut request = NewTask::new(title);
        request.image_url = image_url;
        request.validate()?;
        self.repository.add_task(request).await
    }

    /// Applies `request` to the task with the given id.
    pub async fn edit_task(&self, id: TaskId, request: UpdateTaskRequest) -> Result<Task> {
        request.validate()?;
        let mut task = self.require(id).await?;
        request.apply_to(&mut task);
        self.repository.update_task(&task).await
    }

    /// Saves a task edited as a whole (title, status and image).
    ///
    /// The title is stored trimmed, like titles of created and edited tasks.
    pub async fn save_task(&self, task: &Task) -> Result<Task> {
        crate::task::validate_title(&task.title)?;
        let task = Task {
            title: task.title.trim().to_string(),
            ..task.clone()
        };
        self.repository.update_task(&task).await
    }

    /// Flips the completion status of a task.
    pub async fn toggle_task(&self, id: TaskId) -> Result<Task> {
        let task = self.require(id).await?;
        self.repository.update_task(&task.toggled()).await
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.repository.delete_task(id).await
    }

    /// Fetches photos for the photo picker. `None` uses the default count.
    pub async fn photos(&self, count: Option<usize>) -> Result<Vec<Photo>> {
        self.repository
            .get_photos(count.unwrap_or(DEFAULT_PICKER_PHOTO_COUNT))
            .await
    }

    async fn require(&self, id: TaskId) -> Result<Task> {
        self.repository
            .get_task(id)
            .await?
            .ok_or(Error::TaskNotFound(id))
    }
}
