use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a task.
///
/// Synced tasks keep the id assigned by the remote API (positive values).
/// Local-only tasks are given negative ids so the two ranges never collide.
pub type TaskId = i64;

/// A to-do item as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// URL of the attached image, if any.
    pub image_url: Option<String>,
    /// True for tasks created on this device and never received from the remote API.
    pub is_local_only: bool,
    /// True once a task has been edited locally.
    pub is_modified: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a synced task as received from the remote API.
    pub fn synced(id: TaskId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
            image_url: None,
            is_local_only: false,
            is_modified: false,
            created_at: Utc::now(),
        }
    }

    /// Creates a local-only task.
    pub fn local(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            image_url: None,
            is_local_only: true,
            is_modified: false,
            created_at: Utc::now(),
        }
    }

    /// Sets the image URL.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Sets the creation timestamp (useful for testing and ordering).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the completion status.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Returns a copy with the completion status flipped.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Returns true if the task came from the remote API.
    pub fn is_synced(&self) -> bool {
        !self.is_local_only
    }
}

/// A stock photo that can be attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    /// Larger rendition, used for previews in the picker.
    pub regular_url: String,
    /// Small rendition, stored as a task's image URL.
    pub small_url: String,
}

/// Outcome of a refresh from the remote API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Synced tasks written to the local store.
    pub synced: usize,
    /// Photos available for assignment.
    pub photos: usize,
    /// Locally edited synced tasks that were kept instead of overwritten.
    pub preserved: usize,
}
