use std::future::Future;
use std::time::Duration;

use crate::repositories::errors::repository_errors::RepositoryError;

pub mod db_manager;
pub mod errors;
pub mod in_memory;
pub mod league_repository;
pub mod player_repository;
pub mod user_repository;

/// Upper bound for a single database call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Runs one database call under `limit`, mapping the elapsed case to [`RepositoryError::Timeout`].
pub(crate) async fn timed<T, F>(limit: Duration, call: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(RepositoryError::from),
        Err(_) => Err(RepositoryError::Timeout),
    }
}
