//! Headless state holder for a task list screen.
//!
//! Operations never return errors to the caller. Failures are turned into a
//! user-facing message stored in [`UiState::error`], and the task list is
//! refreshed from the repository's watch channel after every operation.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use todosync_core::repository::TaskRepository;
use todosync_core::task::{Photo, SyncReport, Task, TaskError, TaskId, UpdateTaskRequest};
use todosync_core::usecases::TaskService;
use todosync_core::Error;

/// Shown when a refresh from the task API fails.
pub const REFRESH_FAILED_MESSAGE: &str = "Could not refresh tasks from the server.";
/// Shown when the photo picker could not load any photo.
pub const PHOTOS_FAILED_MESSAGE: &str = "Could not load photos.";
/// Shown when a task title is blank.
pub const EMPTY_TITLE_MESSAGE: &str = "Task title cannot be empty.";

/// Snapshot of the task list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub tasks: Vec<Task>,
    pub error: Option<String>,
    pub is_loading: bool,
}

/// State holder driving a task list through a [`TaskService`].
pub struct TaskListModel {
    service: TaskService<dyn TaskRepository>,
    tasks_rx: watch::Receiver<Vec<Task>>,
    state: UiState,
    photos: Vec<Photo>,
    is_photos_loading: bool,
}

impl TaskListModel {
    /// Creates a model observing the repository's task list.
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        let service = TaskService::new(repository);
        let tasks_rx = service.watch();
        Self {
            service,
            tasks_rx,
            state: UiState {
                is_loading: true,
                ..UiState::default()
            },
            photos: Vec::new(),
            is_photos_loading: false,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn is_photos_loading(&self) -> bool {
        self.is_photos_loading
    }

    pub fn service(&self) -> &TaskService<dyn TaskRepository> {
        &self.service
    }

    /// Loads the current task list from the local store.
    pub async fn load(&mut self) {
        match self.service.tasks().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "Task list loaded");
                self.state = UiState {
                    tasks,
                    error: None,
                    is_loading: false,
                };
                self.tasks_rx.borrow_and_update();
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load tasks");
                self.state = UiState {
                    tasks: Vec::new(),
                    error: Some(format!("Could not load tasks: {err}")),
                    is_loading: false,
                };
            }
        }
    }

    /// Refreshes tasks from the network. Returns the sync report on success.
    pub async fn refresh(&mut self) -> Option<SyncReport> {
        self.state.is_loading = true;
        self.state.error = None;

        let report = match self.service.refresh().await {
            Ok(report) => {
                tracing::debug!(synced = report.synced, "Refresh finished");
                Some(report)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Refresh failed");
                self.state.error = Some(REFRESH_FAILED_MESSAGE.to_string());
                None
            }
        };

        self.sync_tasks();
        self.state.is_loading = false;
        report
    }

    /// Clears the current error and refreshes again.
    pub async fn retry(&mut self) -> Option<SyncReport> {
        self.clear_error();
        self.refresh().await
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Adds a local task. Returns the new task on success.
    pub async fn add_task(&mut self, title: &str, image_url: Option<String>) -> Option<Task> {
        let result = self.service.add_task(title, image_url).await;
        let message = |err: &Error| match err {
            Error::Validation(TaskError::EmptyTitle) => EMPTY_TITLE_MESSAGE.to_string(),
            err => format!("Could not add the task: {err}"),
        };
        self.settle(result, message)
    }

    /// Flips the completion status of a task.
    pub async fn toggle_task(&mut self, id: TaskId) -> Option<Task> {
        let title = self.title_of(id);
        let result = self.service.toggle_task(id).await;
        self.settle(result, |_| {
            format!("Could not update the status of task '{title}'.")
        })
    }

    /// Applies a partial update to a task.
    pub async fn edit_task(&mut self, id: TaskId, request: UpdateTaskRequest) -> Option<Task> {
        let title = self.title_of(id);
        let result = self.service.edit_task(id, request).await;
        self.settle(result, |err| match err {
            Error::Validation(TaskError::EmptyTitle) => EMPTY_TITLE_MESSAGE.to_string(),
            Error::Validation(err) => err.to_string(),
            _ => format!("Could not save changes to task '{title}'."),
        })
    }

    /// Saves a task edited as a whole.
    pub async fn save_edited_task(&mut self, task: &Task) -> Option<Task> {
        let result = self.service.save_task(task).await;
        self.settle(result, |err| match err {
            Error::Validation(TaskError::EmptyTitle) => EMPTY_TITLE_MESSAGE.to_string(),
            _ => format!("Could not save changes to task '{}'.", task.title),
        })
    }

    /// Deletes a task. Returns true on success.
    pub async fn delete_task(&mut self, id: TaskId) -> bool {
        let result = self.service.delete_task(id).await;
        self.settle(result, |_| format!("Could not delete task with ID {id}."))
            .is_some()
    }

    /// Loads photos for the photo picker.
    pub async fn load_photos(&mut self, count: Option<usize>) -> bool {
        self.is_photos_loading = true;
        let succeeded = match self.service.photos(count).await {
            Ok(photos) => {
                tracing::debug!(count = photos.len(), "Picker photos loaded");
                self.photos = photos;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load picker photos");
                self.state.error = Some(PHOTOS_FAILED_MESSAGE.to_string());
                false
            }
        };
        self.is_photos_loading = false;
        succeeded
    }

    pub fn clear_photos(&mut self) {
        self.photos.clear();
    }

    /// Records the outcome of an operation and pulls the latest task list.
    fn settle<T>(
        &mut self,
        result: todosync_core::Result<T>,
        message: impl FnOnce(&Error) -> String,
    ) -> Option<T> {
        let value = match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(error = %err, "Task operation failed");
                self.state.error = Some(message(&err));
                None
            }
        };
        self.sync_tasks();
        value
    }

    fn sync_tasks(&mut self) {
        if self.tasks_rx.has_changed().unwrap_or(false) {
            self.state.tasks = self.tasks_rx.borrow_and_update().clone();
            tracing::trace!(count = self.state.tasks.len(), "Task list updated");
        }
    }

    fn title_of(&self, id: TaskId) -> String {
        todosync_core::task::find_task(&self.state.tasks, id)
            .map(|task| task.title.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
