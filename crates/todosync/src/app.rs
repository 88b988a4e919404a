//! Assembles the repository from configuration.

use std::sync::Arc;

use todosync_core::Result;

use crate::config::Config;
use crate::remote::{build_http_client, PlaceholderTaskClient, UnsplashPhotoClient};
use crate::repository::{SyncOptions, SyncedTaskRepository};
use crate::storage::SqliteTaskStore;

/// Builds a [`SyncedTaskRepository`] backed by the HTTP sources and the SQLite store.
pub async fn build_repository(config: &Config) -> Result<Arc<SyncedTaskRepository>> {
    let client = build_http_client(config.http_timeout())?;
    let tasks_api = PlaceholderTaskClient::new(client.clone(), &config.tasks_url);
    let photos_api = UnsplashPhotoClient::new(client, &config.photos_url, &config.photos_access_key);
    if config.photos_access_key.is_empty() {
        tracing::warn!("UNSPLASH_ACCESS_KEY is not set, photo requests will be rejected");
    }

    let store = SqliteTaskStore::new(&config.db_path).await?;
    let repository = SyncedTaskRepository::new(
        Arc::new(tasks_api),
        Arc::new(photos_api),
        Arc::new(store),
        SyncOptions::from(config),
    )
    .await?;

    tracing::debug!(
        tasks_url = %config.tasks_url,
        photos_url = %config.photos_url,
        db_path = %config.db_path,
        "Repository ready"
    );
    Ok(Arc::new(repository))
}
