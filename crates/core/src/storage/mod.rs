mod error;
mod traits;

pub use error::{StoreError, Result};
pub use traits::TaskStore;
