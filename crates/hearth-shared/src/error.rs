use std::time::Duration;

use thiserror::Error;

/// Failure of a request sent across the process boundary to the backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend received the call and refused it.
    #[error("Backend rejected the call: {0}")]
    Rejected(String),

    /// The backend process is not reachable.
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;
