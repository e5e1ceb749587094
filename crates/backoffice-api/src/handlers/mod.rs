//! API request handlers.

pub mod catalog;
pub mod datatables;
pub mod events;
pub mod health;

pub use catalog::*;
pub use datatables::*;
pub use events::*;
pub use health::*;

use crate::error::{ApiError, Result};

/// Runs storage or pipeline work on the blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}
