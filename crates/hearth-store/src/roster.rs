//! In-memory user roster.
//!
//! Keeps the users known to the backend in arrival order, unique by id.
//! Lookups that miss are silent no-ops: roster events can arrive out of
//! order or twice, and neither case is an error.

use hearth_shared::types::{User, UserField, UserId};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    users: Vec<User>,
}

impl Roster {
    /// Create a new, empty roster.
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    fn position(&self, id: UserId) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    /// Insert a user or replace the record with the same id.
    ///
    /// A replacement keeps the previous `comment` and `profile_picture`,
    /// which are only ever changed through [`Roster::set_field`]. A fresh
    /// insert always starts with `talking` cleared.
    pub fn upsert(&mut self, mut user: User) {
        match self.position(user.id) {
            Some(index) => {
                let previous = &mut self.users[index];
                user.comment = std::mem::take(&mut previous.comment);
                user.profile_picture = std::mem::take(&mut previous.profile_picture);
                *previous = user;
                trace!(user = %previous.id, "Replaced roster entry");
            }
            None => {
                user.talking = false;
                debug!(user = %user.id, name = %user.name, "Added user to roster");
                self.users.push(user);
            }
        }
    }

    /// Remove a user. Returns whether anything was removed.
    pub fn remove(&mut self, id: UserId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.users.remove(index);
                debug!(user = %id, "Removed user from roster");
                true
            }
            None => false,
        }
    }

    /// Set one of the cached text fields. Returns whether the user exists.
    pub fn set_field(&mut self, id: UserId, field: UserField, value: String) -> bool {
        match self.get_mut(id) {
            Some(user) => {
                *user.field_mut(field) = value;
                true
            }
            None => false,
        }
    }

    /// Set the talking flag. Returns whether the user exists.
    pub fn set_talking(&mut self, id: UserId, talking: bool) -> bool {
        match self.get_mut(id) {
            Some(user) => {
                user.talking = talking;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn get_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.position(id).is_some()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
