//! Types shared between the Hearth store and client crates: the user record,
//! the settings subtrees and their wire shapes, the slider time scale, and
//! the error taxonomy for calls into the backend process.

pub mod constants;
pub mod error;
pub mod settings;
pub mod timescale;
pub mod types;

pub use error::BackendError;
pub use settings::{
    AdvancedSettings, AudioInputSettings, FrontendSettings, InputMode, SettingsName,
    SettingsTree, VoiceActivationOptions,
};
pub use types::{User, UserField, UserId};
