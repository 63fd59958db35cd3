//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the client starts with zero configuration.

use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upper bound for a single request to the backend.
    /// Env: `HEARTH_BACKEND_TIMEOUT_MS`
    /// Default: `5000`
    pub backend_timeout: Duration,

    /// Events buffered per listener by the in-process backend.
    /// Env: `HEARTH_EVENT_BUFFER`
    /// Default: `256`
    pub event_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_millis(5000),
            event_buffer: 256,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("HEARTH_BACKEND_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) if ms > 0 => config.backend_timeout = Duration::from_millis(ms),
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid HEARTH_BACKEND_TIMEOUT_MS, using default"
                    );
                }
            }
        }

        if let Some(val) = lookup("HEARTH_EVENT_BUFFER") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.event_buffer = n,
                _ => {
                    tracing::warn!(value = %val, "Invalid HEARTH_EVENT_BUFFER, using default");
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}
