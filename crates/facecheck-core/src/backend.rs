use crate::types::{NewRecord, Task};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The backend calls the check-in workflow depends on.
///
/// Implemented over HTTP by `facecheck_net::RestBackend`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Create a check-in record. Returns the backend's acknowledgement flag.
    async fn create_record(&self, record: &NewRecord) -> Result<bool, BackendError>;

    /// Create a notification carrying `message`.
    async fn create_notification(&self, message: &str) -> Result<bool, BackendError>;

    /// Fetch the tasks of every customer in `names` with a single request.
    async fn tasks_for_customers(&self, names: &[String]) -> Result<Vec<Task>, BackendError>;
}

