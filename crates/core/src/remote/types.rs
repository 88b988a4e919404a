//! Wire types returned by the remote APIs.

use serde::{Deserialize, Serialize};

use crate::task::{Photo, TaskId};

/// A task as returned by the placeholder task API.
///
/// Fields the application does not use (such as `userId`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

/// Renditions of a photo returned by the photo API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub small: String,
    pub regular: String,
}

/// A photo as returned by the photo API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDto {
    pub id: String,
    pub urls: PhotoUrls,
}

impl From<PhotoDto> for Photo {
    fn from(dto: PhotoDto) -> Self {
        Self {
            id: dto.id,
            regular_url: dto.urls.regular,
            small_url: dto.urls.small,
        }
    }
}
