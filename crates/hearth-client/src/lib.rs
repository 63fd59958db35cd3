pub mod backend;
pub mod bridge;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod views;

use tracing_subscriber::{fmt, EnvFilter};

pub use backend::{Backend, MemoryBackend};
pub use bridge::{apply_event, spawn_event_bridge};
pub use config::ClientConfig;
pub use error::ClientError;
pub use events::{AudioInfoGuard, BackendEvent, EventSubscription};
pub use state::ClientContext;

const DEFAULT_LOG_FILTER: &str = "hearth_client=debug,hearth_store=debug,hearth_shared=info,warn";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Call once, at startup.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("hearth_store=debug"));
        assert!(rendered.contains("warn"));
    }
}
