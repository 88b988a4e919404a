mod error;
mod traits;
mod types;

pub use error::{RemoteError, Result};
pub use traits::{PhotoSource, TaskSource};
pub use types::{PhotoDto, PhotoUrls, TaskDto};
