use hearth_shared::types::UserField;
use hearth_store::Store;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::events::{BackendEvent, EventSubscription};
use crate::state::ClientContext;

/// Apply one backend event to the store.
///
/// Each roster event maps onto exactly one store operation. Level samples
/// are view-local and leave the store alone; returns whether the store was
/// touched.
pub fn apply_event(store: &Store, event: BackendEvent) -> bool {
    match event {
        BackendEvent::AudioPreview(_) => return false,
        BackendEvent::UserUpdate(user) => store.upsert_user(user),
        BackendEvent::UserRemove(id) => store.remove_user(id),
        BackendEvent::UserComment(update) => {
            store.set_user_field(update.user_id, UserField::Comment, update.data)
        }
        BackendEvent::UserImage(update) => {
            store.set_user_field(update.user_id, UserField::ProfilePicture, update.data)
        }
        BackendEvent::UserTalking(update) => store.set_talking(update.user_id, update.talking),
        BackendEvent::ConnectionState(connected) => store.set_connected(connected),
        BackendEvent::CurrentUser(id) => store.focus_user(id),
    }
    true
}

/// Subscribe to the backend and spawn the loop that feeds its events into
/// the store, one at a time, until the backend closes the stream.
pub fn spawn_event_bridge(ctx: &ClientContext) -> JoinHandle<()> {
    let events = EventSubscription::new("store-bridge", ctx.backend().listen());
    let store = ctx.store().clone();

    tokio::spawn(async move {
        event_loop(store, events).await;
    })
}

async fn event_loop(store: Store, mut events: EventSubscription) {
    info!("Backend event bridge started");

    while let Some(event) = events.recv().await {
        let name = event.name();
        if apply_event(&store, event) {
            debug!(event = name, "Backend event applied");
        } else {
            trace!(event = name, "Backend event skipped by bridge");
        }
    }

    info!("Backend event stream closed, bridge stopped");
}
