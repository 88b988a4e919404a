use async_trait::async_trait;

use super::{PhotoDto, Result, TaskDto};

/// Remote source of tasks.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetches every task the remote API exposes.
    async fn fetch_tasks(&self) -> Result<Vec<TaskDto>>;
}

/// Remote source of random stock photos.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Fetches up to `count` random photos in a single request.
    async fn random_photos(&self, count: usize) -> Result<Vec<PhotoDto>>;
}
