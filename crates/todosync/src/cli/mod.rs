//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};

use todosync_core::photo::DEFAULT_PICKER_PHOTO_COUNT;
use todosync_core::task::{TaskId, UpdateTaskRequest};

/// To-do list synced from a remote task API, with stock photos.
#[derive(Debug, Parser)]
#[command(name = "todosync")]
#[command(about = "To-do list synced from a remote task API", long_about = None)]
pub struct Cli {
    /// Path to the local SQLite database.
    #[arg(long, env = "TODOSYNC_DB_PATH")]
    pub db: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List tasks from the local store.
    List,
    /// Refresh tasks from the remote API.
    Sync,
    /// Add a local task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,
        /// Image URL to attach.
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Edit a task.
    Edit {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: TaskId,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New image URL.
        #[arg(long, conflicts_with = "clear_image")]
        image_url: Option<String>,
        /// Remove the attached image.
        #[arg(long)]
        clear_image: bool,
        /// Set the completion status.
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip the completion status of a task.
    Toggle {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: TaskId,
    },
    /// Delete a task.
    Delete {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: TaskId,
    },
    /// Show random photos from the photo API.
    Photos {
        /// Number of photos.
        #[arg(long, default_value_t = DEFAULT_PICKER_PHOTO_COUNT)]
        count: usize,
    },
    /// Attach a random photo to a task.
    Pick {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: TaskId,
        /// Index of the photo among the fetched ones.
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Number of photos to choose from.
        #[arg(long, default_value_t = DEFAULT_PICKER_PHOTO_COUNT)]
        count: usize,
    },
}

/// Builds the update request for `edit` from its flags.
pub fn edit_request(
    title: Option<String>,
    image_url: Option<String>,
    clear_image: bool,
    completed: Option<bool>,
) -> UpdateTaskRequest {
    let mut request = UpdateTaskRequest::new();
    if let Some(title) = title {
        request = request.with_title(title);
    }
    if let Some(completed) = completed {
        request = request.with_completed(completed);
    }
    if clear_image {
        request = request.clear_image();
    } else if let Some(url) = image_url {
        request = request.with_image_url(url);
    }
    request
}
