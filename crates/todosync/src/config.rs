use std::{env, time::Duration};

use todosync_core::photo::MAX_PHOTOS_PER_REQUEST;

/// Default base URL of the placeholder task API.
pub const DEFAULT_TASKS_URL: &str = "https://jsonplaceholder.typicode.com";
/// Default base URL of the photo API.
pub const DEFAULT_PHOTOS_URL: &str = "https://api.unsplash.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the task API (default: JSONPlaceholder)
    pub tasks_url: String,
    /// Base URL of the photo API (default: Unsplash)
    pub photos_url: String,
    /// Access key sent as `client_id` to the photo API
    pub photos_access_key: String,
    /// Path to SQLite database file (default: "todosync.db")
    pub db_path: String,
    /// Maximum number of remote tasks kept per refresh (default: 100)
    pub max_synced_tasks: usize,
    /// Photos requested per photo API call (default: 30)
    pub photo_batch_size: usize,
    /// HTTP request timeout in seconds (default: 15)
    pub http_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TODOSYNC_TASKS_URL` - Task API base URL
    /// - `TODOSYNC_PHOTOS_URL` - Photo API base URL
    /// - `UNSPLASH_ACCESS_KEY` - Photo API access key (default: empty)
    /// - `TODOSYNC_DB_PATH` - SQLite database path (default: "todosync.db")
    /// - `TODOSYNC_MAX_SYNCED_TASKS` - Remote tasks kept per refresh (default: 100)
    /// - `TODOSYNC_PHOTO_BATCH_SIZE` - Photos per request, capped at 30 (default: 30)
    /// - `TODOSYNC_HTTP_TIMEOUT_SECONDS` - HTTP timeout (default: 15)
    pub fn from_env() -> Self {
        Self {
            tasks_url: env::var("TODOSYNC_TASKS_URL")
                .unwrap_or_else(|_| DEFAULT_TASKS_URL.to_string()),
            photos_url: env::var("TODOSYNC_PHOTOS_URL")
                .unwrap_or_else(|_| DEFAULT_PHOTOS_URL.to_string()),
            photos_access_key: env::var("UNSPLASH_ACCESS_KEY").unwrap_or_default(),
            db_path: env::var("TODOSYNC_DB_PATH").unwrap_or_else(|_| "todosync.db".to_string()),
            max_synced_tasks: env::var("TODOSYNC_MAX_SYNCED_TASKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            photo_batch_size: env::var("TODOSYNC_PHOTO_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_PHOTOS_PER_REQUEST),
            http_timeout_seconds: env::var("TODOSYNC_HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
        }
    }

    /// Photos per request, clamped to what the photo API accepts.
    pub fn effective_batch_size(&self) -> usize {
        self.photo_batch_size.clamp(1, MAX_PHOTOS_PER_REQUEST)
    }

    /// Get HTTP timeout as a Duration.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
