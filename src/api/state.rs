//! Application state for the API server.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::db::Store;
use crate::error::{AppError, AppResult};

/// Shared application state.
///
/// The store is built once at startup and shared read-only by every
/// handler; cloning the state clones the `Arc`, not the repositories.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Store, request_timeout: Duration) -> Self {
        Self {
            store: Arc::new(store),
            request_timeout,
        }
    }

    /// Get a reference to the repository aggregate.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run storage work under the request deadline.
    ///
    /// On expiry the inner future is dropped, which aborts the statement
    /// and rolls back any transaction it had open.
    pub async fn with_deadline<F, T>(&self, work: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.request_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(AppError::database("request timeout")
                .with_details(format!("deadline of {:?} exceeded", self.request_timeout))),
        }
    }
}
