//! In-process backend.
//!
//! Keeps saved settings in memory, records what was applied and broadcasts
//! events to every listener. Used by the headless demo and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use hearth_shared::error::{BackendError, Result};
use hearth_shared::settings::{AudioInputSettings, FrontendSettings, SettingsName};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::Backend;
use crate::events::BackendEvent;

pub struct MemoryBackend {
    settings: Mutex<HashMap<SettingsName, String>>,
    devices: Mutex<Vec<String>>,
    applied_audio: Mutex<Vec<AudioInputSettings>>,
    opened_urls: Mutex<Vec<String>>,
    audio_info: AtomicBool,
    disable_calls: AtomicUsize,
    online: AtomicBool,
    /// When set, every request fails with this message.
    reject: Mutex<Option<String>>,
    events: broadcast::Sender<BackendEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    /// Create a backend whose event channel buffers `capacity` events per
    /// listener.
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            settings: Mutex::new(HashMap::new()),
            devices: Mutex::new(Vec::new()),
            applied_audio: Mutex::new(Vec::new()),
            opened_urls: Mutex::new(Vec::new()),
            audio_info: AtomicBool::new(false),
            disable_calls: AtomicUsize::new(0),
            online: AtomicBool::new(true),
            reject: Mutex::new(None),
            events,
        }
    }

    pub fn with_devices<I, S>(self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_devices(devices);
        self
    }

    pub fn set_devices<I, S>(&self, devices: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *lock(&self.devices) = devices.into_iter().map(Into::into).collect();
    }

    /// Seed a stored payload verbatim, including malformed ones.
    pub fn store_raw_settings(&self, name: SettingsName, payload: impl Into<String>) {
        lock(&self.settings).insert(name, payload.into());
    }

    pub fn saved_settings(&self, name: SettingsName) -> Option<String> {
        lock(&self.settings).get(&name).cloned()
    }

    /// Every audio configuration applied through `set_audio_input_setting`.
    pub fn applied_audio_settings(&self) -> Vec<AudioInputSettings> {
        lock(&self.applied_audio).clone()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        lock(&self.opened_urls).clone()
    }

    pub fn audio_info_enabled(&self) -> bool {
        self.audio_info.load(Ordering::SeqCst)
    }

    pub fn disable_calls(&self) -> usize {
        self.disable_calls.load(Ordering::SeqCst)
    }

    /// Make every request fail (`Some`) or succeed again (`None`).
    pub fn reject_calls(&self, reason: Option<&str>) {
        *lock(&self.reject) = reason.map(str::to_string);
    }

    /// Simulate the backend process going away (`false`) or coming back.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        info!(online, "Backend availability changed");
    }

    fn check(&self) -> Result<()> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable);
        }
        match lock(&self.reject).as_ref() {
            Some(reason) => Err(BackendError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    /// Broadcast an event. Returns the number of listeners that received it.
    pub fn emit(&self, event: BackendEvent) -> usize {
        let name = event.name();
        match self.events.send(event) {
            Ok(listeners) => listeners,
            Err(_) => {
                debug!(event = name, "No listeners for backend event");
                0
            }
        }
    }

    /// Emit a level sample if audio info is enabled.
    pub fn emit_audio_level(&self, level: f32) -> bool {
        if !self.audio_info_enabled() {
            return false;
        }
        self.emit(BackendEvent::AudioPreview(level));
        true
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_frontend_settings(&self, name: SettingsName) -> Result<String> {
        self.check()?;
        self.saved_settings(name)
            .ok_or_else(|| BackendError::Rejected(format!("no settings stored under {name}")))
    }

    async fn save_frontend_settings(
        &self,
        name: SettingsName,
        data: FrontendSettings,
    ) -> Result<()> {
        self.check()?;
        let payload = data.to_payload()?;
        lock(&self.settings).insert(name, payload);
        info!(settings = %name, "Settings saved");
        Ok(())
    }

    async fn set_audio_input_setting(&self, settings: AudioInputSettings) -> Result<()> {
        self.check()?;
        lock(&self.applied_audio).push(settings);
        debug!(
            mode = ?settings.input_mode,
            amplification = settings.amplification,
            "Audio input settings applied"
        );
        Ok(())
    }

    async fn get_audio_devices(&self) -> Result<Vec<String>> {
        self.check()?;
        Ok(lock(&self.devices).clone())
    }

    async fn enable_audio_info(&self) -> Result<()> {
        self.check()?;
        self.audio_info.store(true, Ordering::SeqCst);
        debug!("Audio info enabled");
        Ok(())
    }

    async fn disable_audio_info(&self) -> Result<()> {
        self.disable_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.audio_info.store(false, Ordering::SeqCst);
        debug!("Audio info disabled");
        Ok(())
    }

    async fn open_in_browser(&self, url: &str) -> Result<()> {
        self.check()?;
        lock(&self.opened_urls).push(url.to_string());
        Ok(())
    }

    fn listen(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}
