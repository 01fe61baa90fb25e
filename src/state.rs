use std::sync::Arc;
use std::time::Duration;

use crate::repository::{EventRepository, PgEventRepository};
use crate::utils::error::AppError;

/// Deadline applied to every repository call made while serving a request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared router state.
///
/// Holds one long-lived repository for the whole process. `None` means the
/// store handle was never established.
#[derive(Clone)]
pub struct AppState {
    repository: Option<Arc<dyn EventRepository>>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self {
            repository: Some(repository),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// State with no repository; every event route answers 503.
    pub fn unavailable() -> Self {
        Self {
            repository: None,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Builds the state from the process-wide pool, if one was published.
    pub fn from_shared_pool() -> Self {
        match crate::db::get() {
            Some(pool) => Self::new(Arc::new(PgEventRepository::new(pool))),
            None => Self::unavailable(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn repository(&self) -> Result<Arc<dyn EventRepository>, AppError> {
        self.repository
            .clone()
            .ok_or_else(|| AppError::Unavailable("database not available".to_string()))
    }
}
