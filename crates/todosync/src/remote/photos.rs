//! Client for the stock photo API.

use async_trait::async_trait;

use todosync_core::remote::{PhotoDto, PhotoSource, Result};

use super::{handle_response, join_url, request_error};

/// HTTP client for an Unsplash-style `/photos/random` endpoint.
#[derive(Debug, Clone)]
pub struct UnsplashPhotoClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl UnsplashPhotoClient {
    /// Create a new client with the given base URL and access key.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            access_key: access_key.into(),
        }
    }
}

#[async_trait]
impl PhotoSource for UnsplashPhotoClient {
    async fn random_photos(&self, count: usize) -> Result<Vec<PhotoDto>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let url = join_url(&self.base_url, "photos/random");
        let count = count.to_string();
        let response = self
            .client
            .get(&url)
            .header("Accept-Version", "v1")
            .query(&[("count", count.as_str()), ("client_id", self.access_key.as_str())])
            .send()
            .await
            .map_err(request_error)?;
        handle_response(response).await
    }
}
