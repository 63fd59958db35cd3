//! # hearth-store
//!
//! Client-side mirror of the state owned by the backend process: the user
//! roster, the focused user, the connection flag and the frontend settings
//! tree.
//!
//! The crate exposes a clonable [`Store`] handle. All mutations go through
//! its named operations, each of which is synchronous, applied atomically
//! and followed by exactly one observer notification.

pub mod roster;
pub mod store;

mod subscription;

pub use roster::Roster;
pub use store::{Store, StoreChange, StoreState, StoreSummary};
pub use subscription::Subscription;
