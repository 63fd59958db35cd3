//! The roster and settings store.
//!
//! [`Store`] is a cheap, clonable handle around the shared [`StoreState`].
//! Every mutation goes through one of the named operations below. Each
//! operation applies its delta under a single lock, releases the lock, and
//! then notifies observers exactly once with a snapshot of the new state.
//! No operation can fail: missing users are ignored.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hearth_shared::settings::{FrontendSettings, SettingsName, SettingsTree};
use hearth_shared::types::{User, UserField, UserId};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::roster::Roster;
use crate::subscription::{ObserverList, Subscription};

/// What the last operation was. Passed to observers with the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    UserUpserted(UserId),
    UserRemoved(UserId),
    UserFieldChanged { user_id: UserId, field: UserField },
    TalkingChanged { user_id: UserId, talking: bool },
    FocusChanged(UserId),
    ConnectionChanged(bool),
    SettingsChanged(SettingsName),
}

/// Everything the store holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    roster: Roster,
    /// Reference into `roster`; never a copy of the record.
    current_user: Option<UserId>,
    connected: bool,
    settings: SettingsTree,
}

impl StoreState {
    pub fn users(&self) -> &[User] {
        self.roster.users()
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.roster.get(id)
    }

    /// The focused user, if one is set and still in the roster.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.and_then(|id| self.roster.get(id))
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.current_user
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn settings(&self) -> &SettingsTree {
        &self.settings
    }

    /// Serializable view of the state, e.g. for logging or a debug pane.
    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            users: self.users().to_vec(),
            current_user: self.current_user().cloned(),
            connected: self.connected,
            settings: self.settings,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub users: Vec<User>,
    pub current_user: Option<User>,
    pub connected: bool,
    pub settings: SettingsTree,
}

/// Shared handle to the client-side store.
#[derive(Clone, Default)]
pub struct Store {
    state: Arc<Mutex<StoreState>>,
    observers: Arc<ObserverList>,
}

impl Store {
    /// Create a store with an empty roster and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Reducers never panic halfway through, so a poisoned state is whole.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply<F>(&self, change: StoreChange, reduce: F)
    where
        F: FnOnce(&mut StoreState),
    {
        let snapshot = {
            let mut state = self.lock();
            reduce(&mut *state);
            state.clone()
        };
        trace!(?change, "Store updated");
        self.observers.notify(&change, &snapshot);
    }

    /// Register an observer, called once after every operation.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&StoreChange, &StoreState) + Send + Sync + 'static,
    {
        self.observers.register(Arc::new(observer))
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // -- Operations --

    /// Insert a user, or replace the record with the same id while keeping
    /// its cached `comment` and `profile_picture`.
    pub fn upsert_user(&self, user: User) {
        let id = user.id;
        self.apply(StoreChange::UserUpserted(id), |state| {
            state.roster.upsert(user);
        });
    }

    pub fn remove_user(&self, id: UserId) {
        self.apply(StoreChange::UserRemoved(id), |state| {
            state.roster.remove(id);
        });
    }

    pub fn set_user_field(&self, id: UserId, field: UserField, value: impl Into<String>) {
        let value = value.into();
        self.apply(StoreChange::UserFieldChanged { user_id: id, field }, |state| {
            if !state.roster.set_field(id, field, value) {
                trace!(user = %id, %field, "Field update for unknown user ignored");
            }
        });
    }

    pub fn set_talking(&self, id: UserId, talking: bool) {
        self.apply(StoreChange::TalkingChanged { user_id: id, talking }, |state| {
            state.roster.set_talking(id, talking);
        });
    }

    /// Focus a user. An unknown id leaves the current focus untouched.
    pub fn focus_user(&self, id: UserId) {
        self.apply(StoreChange::FocusChanged(id), |state| {
            if state.roster.contains(id) {
                state.current_user = Some(id);
                debug!(user = %id, "Current user changed");
            }
        });
    }

    pub fn set_connected(&self, connected: bool) {
        self.apply(StoreChange::ConnectionChanged(connected), |state| {
            state.connected = connected;
        });
        info!(connected, "Connection state changed");
    }

    /// Replace one settings subtree as a whole.
    pub fn update_settings_subtree(&self, value: FrontendSettings) {
        let name = value.settings_name();
        self.apply(StoreChange::SettingsChanged(name), |state| {
            state.settings.replace(value);
        });
        debug!(settings = %name, "Settings subtree replaced");
    }

    // -- Reads --

    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users().to_vec()
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.lock().user(id).cloned()
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().current_user().cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_connected()
    }

    pub fn settings(&self) -> SettingsTree {
        *self.lock().settings()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.lock())
            .field("observers", &self.observers.len())
            .finish()
    }
}
