//! Observer registration for the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::store::{StoreChange, StoreState};

pub(crate) type Observer = Arc<dyn Fn(&StoreChange, &StoreState) + Send + Sync>;

#[derive(Default)]
pub(crate) struct ObserverList {
    next_id: AtomicU64,
    observers: Mutex<Vec<(u64, Observer)>>,
}

impl ObserverList {
    pub(crate) fn register(self: &Arc<Self>, observer: Observer) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));

        Subscription {
            id,
            list: Arc::downgrade(self),
        }
    }

    fn unregister(&self, id: u64) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(observer_id, _)| *observer_id != id);
    }

    /// Call every observer once. The list lock is not held during the calls,
    /// so observers may subscribe or unsubscribe themselves.
    pub(crate) fn notify(&self, change: &StoreChange, state: &StoreState) {
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();

        for observer in observers {
            observer(change, state);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle returned by [`crate::Store::subscribe`].
///
/// The observer stays registered for as long as this handle lives; dropping
/// it unregisters the observer.
#[must_use = "dropping a Subscription unregisters the observer immediately"]
pub struct Subscription {
    id: u64,
    list: Weak<ObserverList>,
}

impl Subscription {
    /// Explicitly unregister. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.unregister(self.id);
            tracing::trace!(subscription = self.id, "Store observer released");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
