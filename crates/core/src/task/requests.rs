//! Request types for task operations.
//!
//! These are pure data types shared by the use-case layer and the front end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::TaskError;
use super::operations::validate_title;
use super::types::{Task, TaskId};

/// Request payload for creating a local task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewTask {
    /// Create a new request with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: None,
        }
    }

    /// Set the image URL.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), TaskError> {
        validate_title(&self.title)
    }

    /// Convert into a local-only task with the given id.
    pub fn into_task(self, id: TaskId, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title.trim().to_string(),
            completed: false,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            is_local_only: true,
            is_modified: false,
            created_at: now,
        }
    }
}

/// Change to apply to a task's image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageChange {
    #[default]
    Keep,
    Set(String),
    Clear,
}

/// Request payload for updating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default)]
    pub image: ImageChange,
}

impl UpdateTaskRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the task title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the completion status.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Attach an image.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image = ImageChange::Set(image_url.into());
        self
    }

    /// Remove the image.
    pub fn clear_image(mut self) -> Self {
        self.image = ImageChange::Clear;
        self
    }

    /// Returns true if the request changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.image == ImageChange::Keep
    }

    /// Validate the request. Only a provided title is checked.
    pub fn validate(&self) -> Result<(), TaskError> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }

    /// Apply updates to an existing task and mark it modified.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        match self.image {
            ImageChange::Keep => {}
            ImageChange::Set(url) => task.image_url = Some(url),
            ImageChange::Clear => task.image_url = None,
        }
        task.is_modified = true;
    }
}
