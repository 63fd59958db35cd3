//! Context shared by every view.
//!
//! [`ClientContext`] bundles the store, the backend handle and the
//! configuration. It is cheap to clone and each view keeps its own copy.

use std::future::Future;
use std::sync::Arc;

use hearth_shared::BackendError;
use hearth_store::Store;
use tracing::warn;

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

#[derive(Clone)]
pub struct ClientContext {
    store: Store,
    backend: Arc<dyn Backend>,
    config: ClientConfig,
}

impl ClientContext {
    pub fn new(store: Store, backend: Arc<dyn Backend>, config: ClientConfig) -> Self {
        Self {
            store,
            backend,
            config,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Await a backend request under the configured timeout.
    ///
    /// Failures are logged here, at the call site, and returned so the view
    /// can decide whether to show them.
    pub async fn call<T, F>(&self, command: &'static str, request: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, BackendError>>,
    {
        let timeout = self.config.backend_timeout;
        let outcome = match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(timeout)),
        };

        outcome.map_err(|e| {
            warn!(command, error = %e, "Backend call failed");
            ClientError::backend(command, e)
        })
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
