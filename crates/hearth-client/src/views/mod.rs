//! Headless view controllers.
//!
//! Each sub-module holds the state one screen binds to, plus the commands
//! its controls trigger. Rendering is left to the embedding UI.

pub mod advanced;
pub mod audio;
pub mod chat;
pub mod lightbox;

pub use advanced::AdvancedSettingsView;
pub use audio::AudioSettingsView;
pub use chat::ChatView;
pub use lightbox::LightBoxImage;
