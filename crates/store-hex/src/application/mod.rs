pub mod order_service;
pub mod password;
pub mod product_service;
pub mod user_service;

use crate::errors::AppError;
use store_types::ports::RepoError;

/// Rewrites a storage conflict with a message that names the offending
/// value; other storage errors stay internal.
fn conflict(err: RepoError, message: impl FnOnce() -> String) -> AppError {
    match err {
        RepoError::Conflict(detail) => {
            tracing::debug!(%detail, "storage constraint rejected write");
            AppError::Conflict(message())
        }
        other => other.into(),
    }
}
