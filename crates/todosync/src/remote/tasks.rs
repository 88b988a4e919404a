//! Client for the placeholder task API.

use async_trait::async_trait;

use todosync_core::remote::{Result, TaskDto, TaskSource};

use super::{handle_response, join_url, request_error};

/// HTTP client for a JSONPlaceholder-style `/todos` endpoint.
#[derive(Debug, Clone)]
pub struct PlaceholderTaskClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlaceholderTaskClient {
    /// Create a new client with the given base URL.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TaskSource for PlaceholderTaskClient {
    async fn fetch_tasks(&self) -> Result<Vec<TaskDto>> {
        let url = join_url(&self.base_url, "todos");
        tracing::debug!(%url, "Fetching remote tasks");

        let response = self.client.get(&url).send().await.map_err(request_error)?;
        handle_response(response).await
    }
}
