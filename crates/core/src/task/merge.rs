//! Reconciliation of remote tasks with the local store.
//!
//! Pure functions that turn a batch of remote tasks plus a set of photos into
//! the synced tasks that should be written locally. Synced tasks edited on this
//! device win over the remote copy (last write wins), so they are left out of
//! the batch and the stored version is kept.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::types::{Photo, Task, TaskId};
use crate::remote::TaskDto;

/// Image assigned to synced tasks when no photo could be fetched.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/50";

/// Picks the image for the task at `index`.
///
/// Photos are reused cyclically when there are fewer photos than tasks.
pub fn assign_image(index: usize, photos: &[Photo]) -> String {
    if photos.is_empty() {
        PLACEHOLDER_IMAGE_URL.to_string()
    } else {
        photos[index % photos.len()].small_url.clone()
    }
}

/// Returns true if `id` can belong to a synced task.
///
/// Zero and negative ids are reserved for local-only tasks.
pub fn is_remote_id(id: TaskId) -> bool {
    id > 0
}

/// Keeps at most `limit` remote tasks, in the order the API returned them.
///
/// Tasks whose id is not a valid remote id are dropped before the limit is
/// applied, so they can never replace a local-only task.
pub fn limit_remote_tasks(remote: Vec<TaskDto>, limit: usize) -> Vec<TaskDto> {
    remote
        .into_iter()
        .filter(|dto| is_remote_id(dto.id))
        .take(limit)
        .collect()
}

/// Converts remote tasks into synced tasks ready to be stored.
///
/// Tasks whose id is in `preserved` or is not a valid remote id are skipped. Images are assigned by the
/// task's position in `remote`, so skipping a task does not shift the images
/// of the others. Every task shares the `synced_at` timestamp, which keeps the
/// API order when the list is sorted.
pub fn reconcile_synced(
    remote: &[TaskDto],
    photos: &[Photo],
    preserved: &HashSet<TaskId>,
    synced_at: DateTime<Utc>,
) -> Vec<Task> {
    remote
        .iter()
        .enumerate()
        .filter(|(_, dto)| is_remote_id(dto.id) && !preserved.contains(&dto.id))
        .map(|(index, dto)| Task {
            id: dto.id,
            title: dto.title.clone(),
            completed: dto.completed,
            image_url: Some(assign_image(index, photos)),
            is_local_only: false,
            is_modified: false,
            created_at: synced_at,
        })
        .collect()
}
