mod error;
mod merge;
mod operations;
mod requests;
mod types;

pub use error::TaskError;
pub use merge::{
    assign_image, is_remote_id, limit_remote_tasks, reconcile_synced, PLACEHOLDER_IMAGE_URL,
};
pub use operations::{compare_tasks, find_task, sort_tasks, validate_title, MAX_TITLE_LENGTH};
pub use requests::{ImageChange, NewTask, UpdateTaskRequest};
pub use types::{Photo, SyncReport, Task, TaskId};
