//! HTTP implementations of the remote sources.

pub mod photos;
pub mod tasks;

use std::time::Duration;

use todosync_core::remote::{RemoteError, Result};

pub use photos::UnsplashPhotoClient;
pub use tasks::PlaceholderTaskClient;

/// Build a reqwest client with the given request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("todosync/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RemoteError::Request(e.to_string()))
}

/// Join a base URL and a path without doubling slashes.
fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map a transport error.
fn request_error(err: reqwest::Error) -> RemoteError {
    if err.is_decode() {
        RemoteError::InvalidResponse(err.to_string())
    } else {
        RemoteError::Request(err.to_string())
    }
}

/// Handle error responses and decode the JSON body.
async fn handle_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        let body = response.bytes().await.map_err(request_error)?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        match status.as_u16() {
            401 | 403 => Err(RemoteError::Unauthorized(message)),
            code => Err(RemoteError::Status {
                status: code,
                message,
            }),
        }
    }
}
