use hearth_shared::BackendError;
use thiserror::Error;

/// Errors surfaced by views and the backend boundary.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Backend call `{command}` failed: {source}")]
    Backend {
        command: &'static str,
        #[source]
        source: BackendError,
    },

    /// A setting outside the range the control accepts.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Unknown audio device: {0}")]
    UnknownDevice(String),
}

impl ClientError {
    pub fn backend(command: &'static str, source: BackendError) -> Self {
        Self::Backend { command, source }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
