//! Events relayed from the backend process and the scoped handles used to
//! listen to them.

use hearth_shared::types::{User, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::state::ClientContext;

pub const EVENT_AUDIO_PREVIEW: &str = "audio_preview";
pub const EVENT_USER_UPDATE: &str = "user_update";
pub const EVENT_USER_REMOVE: &str = "user_remove";
pub const EVENT_USER_COMMENT: &str = "user_comment";
pub const EVENT_USER_IMAGE: &str = "user_image";
pub const EVENT_USER_TALKING: &str = "user_talking";
pub const EVENT_CONNECTION_STATE: &str = "connection_state";
pub const EVENT_CURRENT_USER: &str = "current_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDataPayload {
    pub user_id: UserId,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkingPayload {
    pub user_id: UserId,
    pub talking: bool,
}

/// One event as emitted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum BackendEvent {
    /// Live input level sample in `[0, 1]`, sent while audio info is enabled.
    AudioPreview(f32),
    UserUpdate(User),
    UserRemove(UserId),
    UserComment(UserDataPayload),
    UserImage(UserDataPayload),
    UserTalking(TalkingPayload),
    ConnectionState(bool),
    CurrentUser(UserId),
}

impl BackendEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AudioPreview(_) => EVENT_AUDIO_PREVIEW,
            Self::UserUpdate(_) => EVENT_USER_UPDATE,
            Self::UserRemove(_) => EVENT_USER_REMOVE,
            Self::UserComment(_) => EVENT_USER_COMMENT,
            Self::UserImage(_) => EVENT_USER_IMAGE,
            Self::UserTalking(_) => EVENT_USER_TALKING,
            Self::ConnectionState(_) => EVENT_CONNECTION_STATE,
            Self::CurrentUser(_) => EVENT_CURRENT_USER,
        }
    }
}

/// A live subscription to the backend event stream.
///
/// Dropping it releases the underlying receiver, after which the backend no
/// longer buffers events for this listener.
pub struct EventSubscription {
    label: &'static str,
    rx: broadcast::Receiver<BackendEvent>,
}

impl EventSubscription {
    pub fn new(label: &'static str, rx: broadcast::Receiver<BackendEvent>) -> Self {
        debug!(listener = label, "Subscribed to backend events");
        Self { label, rx }
    }

    /// Wait for the next event. `None` once the backend side has closed.
    pub async fn recv(&mut self) -> Option<BackendEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(listener = self.label, skipped, "Event listener lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-buffered event, if any.
    pub fn try_recv(&mut self) -> Option<BackendEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(listener = self.label, skipped, "Event listener lagged, events dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        trace!(listener = self.label, "Backend event subscription released");
    }
}

/// Enables the backend's audio level stream for as long as it lives.
///
/// Call [`AudioInfoGuard::release`] on teardown. If the guard is dropped
/// without being released, the matching `disable_audio_info` call is spawned
/// on the current runtime instead.
pub struct AudioInfoGuard {
    ctx: ClientContext,
    events: EventSubscription,
    released: bool,
}

impl AudioInfoGuard {
    pub async fn acquire(ctx: &ClientContext) -> Result<Self> {
        // Listen first so the first sample after enabling is not missed.
        let events = EventSubscription::new(EVENT_AUDIO_PREVIEW, ctx.backend().listen());
        ctx.call(
            hearth_shared::constants::CMD_ENABLE_AUDIO_INFO,
            ctx.backend().enable_audio_info(),
        )
        .await?;

        Ok(Self {
            ctx: ctx.clone(),
            events,
            released: false,
        })
    }

    /// Latest buffered level sample, skipping unrelated events.
    pub fn try_next_level(&mut self) -> Option<f32> {
        while let Some(event) = self.events.try_recv() {
            if let BackendEvent::AudioPreview(level) = event {
                return Some(level);
            }
        }
        None
    }

    /// Wait for the next level sample.
    pub async fn next_level(&mut self) -> Option<f32> {
        while let Some(event) = self.events.recv().await {
            if let BackendEvent::AudioPreview(level) = event {
                return Some(level);
            }
        }
        None
    }

    /// Disable the level stream and drop the subscription.
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        self.ctx
            .call(
                hearth_shared::constants::CMD_DISABLE_AUDIO_INFO,
                self.ctx.backend().disable_audio_info(),
            )
            .await
    }
}

impl Drop for AudioInfoGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let backend = self.ctx.backend().clone();
                handle.spawn(async move {
                    if let Err(e) = backend.disable_audio_info().await {
                        warn!(error = %e, "Failed to disable audio info on drop");
                    }
                });
                debug!("Audio info guard dropped without release, disabling in background");
            }
            Err(_) => {
                warn!("Audio info guard dropped outside a runtime, stream left enabled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hearth_store::Store;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::config::ClientConfig;

    fn context() -> (Arc<MemoryBackend>, ClientContext) {
        let backend = Arc::new(MemoryBackend::new(16));
        let ctx = ClientContext::new(Store::new(), backend.clone(), ClientConfig::default());
        (backend, ctx)
    }

    #[test]
    fn test_event_wire_shape() {
        let event = BackendEvent::UserTalking(TalkingPayload {
            user_id: UserId(3),
            talking: true,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "event": "user_talking",
                "payload": { "user_id": 3, "talking": true }
            })
        );
        assert_eq!(event.name(), EVENT_USER_TALKING);

        let parsed: BackendEvent =
            serde_json::from_str(r#"{"event":"audio_preview","payload":0.5}"#).unwrap();
        assert_eq!(parsed, BackendEvent::AudioPreview(0.5));
    }

    #[tokio::test]
    async fn test_guard_enables_and_releases() {
        let (backend, ctx) = context();

        let mut guard = AudioInfoGuard::acquire(&ctx).await.unwrap();
        assert!(backend.audio_info_enabled());

        backend.emit(BackendEvent::ConnectionState(true));
        assert!(backend.emit_audio_level(0.25));
        assert_eq!(guard.try_next_level(), Some(0.25));
        assert_eq!(guard.try_next_level(), None);

        guard.release().await.unwrap();
        assert!(!backend.audio_info_enabled());
        assert!(!backend.emit_audio_level(0.5));
    }

    #[tokio::test]
    async fn test_guard_drop_disables_in_background() {
        let (backend, ctx) = context();

        let guard = AudioInfoGuard::acquire(&ctx).await.unwrap();
        drop(guard);

        for _ in 0..10 {
            if !backend.audio_info_enabled() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!backend.audio_info_enabled());
    }

    #[tokio::test]
    async fn test_acquire_failure_is_reported() {
        let (backend, ctx) = context();
        backend.reject_calls(Some("device busy"));

        assert!(AudioInfoGuard::acquire(&ctx).await.is_err());
        assert!(!backend.audio_info_enabled());
    }

    #[tokio::test]
    async fn test_subscription_recv_ends_when_backend_closes() {
        let (tx, rx) = broadcast::channel(4);
        let mut sub = EventSubscription::new("test", rx);
        tx.send(BackendEvent::CurrentUser(UserId(1))).unwrap();
        drop(tx);

        assert_eq!(sub.recv().await, Some(BackendEvent::CurrentUser(UserId(1))));
        assert_eq!(sub.recv().await, None);
    }
}
