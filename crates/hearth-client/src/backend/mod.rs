//! The call boundary to the backend process.
//!
//! The backend owns audio capture, voice detection, settings persistence and
//! the authoritative roster. Views reach it only through [`Backend`], either
//! with request/response calls or by listening to its event stream.

mod memory;

pub use memory::MemoryBackend;

use async_trait::async_trait;
use hearth_shared::error::Result;
use hearth_shared::settings::{AudioInputSettings, FrontendSettings, SettingsName};
use tokio::sync::broadcast;

use crate::events::BackendEvent;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch one stored settings subtree as a raw JSON envelope.
    async fn get_frontend_settings(&self, name: SettingsName) -> Result<String>;

    /// Persist one settings subtree.
    async fn save_frontend_settings(&self, name: SettingsName, data: FrontendSettings)
        -> Result<()>;

    /// Apply audio capture parameters live.
    async fn set_audio_input_setting(&self, settings: AudioInputSettings) -> Result<()>;

    async fn get_audio_devices(&self) -> Result<Vec<String>>;

    /// Start emitting `audio_preview` level samples.
    async fn enable_audio_info(&self) -> Result<()>;

    /// Stop emitting `audio_preview` level samples.
    async fn disable_audio_info(&self) -> Result<()>;

    async fn open_in_browser(&self, url: &str) -> Result<()>;

    /// Subscribe to the backend's event stream.
    fn listen(&self) -> broadcast::Receiver<BackendEvent>;
}
