//! Audio settings screen.
//!
//! Holds the local control state (device, sliders, input mode), shows the
//! live input level while mounted, and on apply persists the resulting
//! [`AudioInputSettings`] and pushes them to the backend.

use hearth_shared::constants::{
    AMPLIFICATION_MAX_DB, AMPLIFICATION_MIN_DB, CMD_GET_AUDIO_DEVICES, CMD_SAVE_FRONTEND_SETTINGS,
    CMD_SET_AUDIO_INPUT_SETTING, DEFAULT_AMPLIFICATION_DB, DEFAULT_FADE_OUT_STEP,
    DEFAULT_HYSTERESIS, DEFAULT_VOICE_HOLD_STEP, TIME_SLIDER_MAX, TIME_SLIDER_MIN,
};
use hearth_shared::settings::{
    AudioInputSettings, FrontendSettings, InputMode, SettingsName, VoiceActivationOptions,
};
use hearth_shared::timescale::{
    format_duration, level_percent, millis_to_slider, slider_scale, slider_to_millis,
};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::events::AudioInfoGuard;
use crate::state::ClientContext;

pub struct AudioSettingsView {
    ctx: ClientContext,
    audio_info: Option<AudioInfoGuard>,
    input_device: Option<String>,
    devices: Vec<String>,
    voice_hold_step: u32,
    fade_out_step: u32,
    amplification_db: u32,
    hysteresis: (f32, f32),
    audio_level: f32,
    input_mode: InputMode,
    advanced_options: bool,
    error_message: Option<String>,
}

impl AudioSettingsView {
    /// Mount the screen and start the live level stream.
    ///
    /// Controls start from the audio settings in the store, or from the
    /// defaults if the backend has not delivered any yet. If the level
    /// stream cannot be enabled the screen still works, without a meter.
    pub async fn mount(ctx: ClientContext) -> Self {
        let mut view = Self {
            audio_info: None,
            input_device: None,
            devices: Vec::new(),
            voice_hold_step: DEFAULT_VOICE_HOLD_STEP,
            fade_out_step: DEFAULT_FADE_OUT_STEP,
            amplification_db: DEFAULT_AMPLIFICATION_DB,
            hysteresis: DEFAULT_HYSTERESIS,
            audio_level: 0.0,
            input_mode: InputMode::default(),
            advanced_options: true,
            error_message: None,
            ctx,
        };

        if let Some(settings) = view.ctx.store().settings().audio_input {
            view.load(&settings);
        }

        match AudioInfoGuard::acquire(&view.ctx).await {
            Ok(guard) => view.audio_info = Some(guard),
            Err(e) => view.error_message = Some(e.to_string()),
        }

        view
    }

    /// Tear the screen down, disabling the level stream.
    pub async fn unmount(mut self) {
        if let Some(guard) = self.audio_info.take() {
            // already logged by the call wrapper
            let _ = guard.release().await;
        }
        debug!("Audio settings view unmounted");
    }

    fn load(&mut self, settings: &AudioInputSettings) {
        let options = &settings.voice_activation_options;
        self.voice_hold_step = millis_to_slider(options.voice_hold);
        self.fade_out_step = millis_to_slider(options.fade_out_duration);
        self.amplification_db = (settings.amplification.round().max(0.0) as u32)
            .clamp(AMPLIFICATION_MIN_DB, AMPLIFICATION_MAX_DB);
        self.hysteresis = (
            options.voice_hysteresis_lower_threshold.clamp(0.0, 1.0),
            options.voice_hysteresis_upper_threshold.clamp(0.0, 1.0),
        );
        self.input_mode = settings.input_mode;
    }

    // -- Live level --

    /// Drain buffered level samples, keeping the latest. Returns how many
    /// samples were consumed.
    pub fn pump_audio_level(&mut self) -> usize {
        let Some(guard) = self.audio_info.as_mut() else {
            return 0;
        };

        let mut consumed = 0;
        while let Some(level) = guard.try_next_level() {
            self.audio_level = level;
            consumed += 1;
        }
        consumed
    }

    /// Wait for the next level sample.
    pub async fn next_audio_level(&mut self) -> Option<f32> {
        let level = self.audio_info.as_mut()?.next_level().await?;
        self.audio_level = level;
        Some(level)
    }

    pub fn audio_level(&self) -> f32 {
        self.audio_level
    }

    pub fn is_metering(&self) -> bool {
        self.audio_info.is_some()
    }

    /// Meter fill in percent.
    pub fn level_percent(&self) -> f32 {
        level_percent(self.audio_level, 1.0)
    }

    /// Position of the activation threshold marker in percent.
    pub fn threshold_percent(&self) -> f32 {
        level_percent(self.hysteresis.1, 1.0)
    }

    /// Whether the current level would open the voice gate.
    pub fn level_above_threshold(&self) -> bool {
        self.audio_level > self.hysteresis.1
    }

    // -- Devices --

    pub async fn refresh_devices(&mut self) -> Result<()> {
        let devices = self
            .ctx
            .call(CMD_GET_AUDIO_DEVICES, self.ctx.backend().get_audio_devices())
            .await?;

        if let Some(selected) = &self.input_device {
            if !devices.contains(selected) {
                info!(device = %selected, "Selected input device disappeared");
                self.input_device = None;
            }
        }

        debug!(count = devices.len(), "Audio devices refreshed");
        self.devices = devices;
        Ok(())
    }

    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    pub fn input_device(&self) -> Option<&str> {
        self.input_device.as_deref()
    }

    /// Select an input device from the last refreshed list, or `None`.
    pub fn select_input_device(&mut self, device: Option<&str>) -> Result<()> {
        match device {
            None => self.input_device = None,
            Some(name) if self.devices.iter().any(|d| d == name) => {
                self.input_device = Some(name.to_string());
            }
            Some(name) => return Err(ClientError::UnknownDevice(name.to_string())),
        }
        Ok(())
    }

    // -- Controls --

    pub fn set_voice_hold_step(&mut self, step: u32) {
        self.voice_hold_step = step.clamp(TIME_SLIDER_MIN, TIME_SLIDER_MAX);
    }

    pub fn set_fade_out_step(&mut self, step: u32) {
        self.fade_out_step = step.clamp(TIME_SLIDER_MIN, TIME_SLIDER_MAX);
    }

    pub fn set_amplification(&mut self, db: u32) {
        self.amplification_db = db.clamp(AMPLIFICATION_MIN_DB, AMPLIFICATION_MAX_DB);
    }

    /// Set both hysteresis thresholds. The thumbs cannot cross: a lower
    /// value above the upper one is pinned to the upper one.
    pub fn set_hysteresis(&mut self, lower: f32, upper: f32) -> Result<()> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(ClientError::InvalidSetting(format!(
                "hysteresis thresholds must be finite, got {lower} - {upper}"
            )));
        }
        let upper = upper.clamp(0.0, 1.0);
        let lower = lower.clamp(0.0, 1.0).min(upper);
        self.hysteresis = (lower, upper);
        Ok(())
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    /// Radio-group variant of [`Self::set_input_mode`].
    pub fn set_input_mode_index(&mut self, index: u8) -> Result<()> {
        let mode = InputMode::from_index(index)
            .ok_or_else(|| ClientError::InvalidSetting(format!("unknown input mode {index}")))?;
        self.set_input_mode(mode);
        Ok(())
    }

    pub fn toggle_advanced_options(&mut self) -> bool {
        self.advanced_options = !self.advanced_options;
        self.advanced_options
    }

    pub fn advanced_options(&self) -> bool {
        self.advanced_options
    }

    /// Voice activation controls are only shown in voice activation mode.
    pub fn shows_voice_activation(&self) -> bool {
        self.input_mode == InputMode::VoiceActivation
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn voice_hold_step(&self) -> u32 {
        self.voice_hold_step
    }

    pub fn fade_out_step(&self) -> u32 {
        self.fade_out_step
    }

    pub fn amplification(&self) -> u32 {
        self.amplification_db
    }

    pub fn hysteresis(&self) -> (f32, f32) {
        self.hysteresis
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    // -- Labels --

    pub fn voice_hold_label(&self) -> String {
        format_duration(slider_scale(self.voice_hold_step))
    }

    pub fn fade_out_label(&self) -> String {
        format_duration(slider_scale(self.fade_out_step))
    }

    pub fn amplification_label(&self) -> String {
        format!("+{}dB", self.amplification_db)
    }

    pub fn hysteresis_label(&self) -> String {
        format!("{} - {}", self.hysteresis.0, self.hysteresis.1)
    }

    // -- Apply --

    pub fn build_settings(&self) -> AudioInputSettings {
        AudioInputSettings {
            amplification: self.amplification_db as f32,
            input_mode: self.input_mode,
            voice_activation_options: VoiceActivationOptions {
                voice_hold: slider_to_millis(self.voice_hold_step),
                fade_out_duration: slider_to_millis(self.fade_out_step),
                voice_hysteresis_lower_threshold: self.hysteresis.0,
                voice_hysteresis_upper_threshold: self.hysteresis.1,
            },
        }
    }

    /// Store, persist and apply the current settings.
    ///
    /// The save and the live apply are independent; both are attempted and
    /// the first failure is returned and shown inline.
    pub async fn apply(&mut self) -> Result<AudioInputSettings> {
        let settings = self.build_settings();
        debug!(?settings, "Applying audio settings");

        self.ctx
            .store()
            .update_settings_subtree(FrontendSettings::AudioInput(settings));

        let saved = self
            .ctx
            .call(
                CMD_SAVE_FRONTEND_SETTINGS,
                self.ctx.backend().save_frontend_settings(
                    SettingsName::AudioInput,
                    FrontendSettings::AudioInput(settings),
                ),
            )
            .await;

        let applied = self
            .ctx
            .call(
                CMD_SET_AUDIO_INPUT_SETTING,
                self.ctx.backend().set_audio_input_setting(settings),
            )
            .await;

        match saved.and(applied) {
            Ok(()) => {
                self.error_message = None;
                info!(mode = ?settings.input_mode, "Audio settings applied");
                Ok(settings)
            }
            Err(e) => {
                warn!(error = %e, "Audio settings only partially applied");
                self.error_message = Some(e.to_string());
                Err(e)
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

    fn context(backend: &Arc<MemoryBackend>) -> ClientContext {
        ClientContext::new(Store::new(), backend.clone(), ClientConfig::default())
    }

    #[tokio::test]
    async fn test_mount_enables_and_unmount_disables_audio_info() {
        let backend = Arc::new(MemoryBackend::new(8));
        let view = AudioSettingsView::mount(context(&backend)).await;
        assert!(view.is_metering());
        assert!(backend.audio_info_enabled());

        view.unmount().await;
        assert!(!backend.audio_info_enabled());
        assert_eq!(backend.disable_calls(), 1);
    }

    #[tokio::test]
    async fn test_defaults() {
        let backend = Arc::new(MemoryBackend::new(8));
        let view = AudioSettingsView::mount(context(&backend)).await;

        assert_eq!(view.voice_hold_step(), 10);
        assert_eq!(view.fade_out_step(), 10);
        assert_eq!(view.amplification(), 10);
        assert_eq!(view.hysteresis(), (0.1, 0.2));
        assert_eq!(view.input_mode(), InputMode::VoiceActivation);
        assert_eq!(view.voice_hold_label(), "6.19ms");
        assert_eq!(view.amplification_label(), "+10dB");
        assert_eq!(view.hysteresis_label(), "0.1 - 0.2");
        view.unmount().await;
    }

    #[tokio::test]
    async fn test_level_samples_update_meter() {
        let backend = Arc::new(MemoryBackend::new(8));
        let mut view = AudioSettingsView::mount(context(&backend)).await;

        backend.emit_audio_level(0.1);
        backend.emit_audio_level(0.5);
        assert_eq!(view.pump_audio_level(), 2);
        assert_eq!(view.audio_level(), 0.5);
        assert_eq!(view.level_percent(), 50.0);
        assert!(view.level_above_threshold());

        backend.emit_audio_level(0.15);
        assert_eq!(view.next_audio_level().await, Some(0.15));
        assert!(!view.level_above_threshold());
        view.unmount().await;
    }

    #[tokio::test]
    async fn test_apply_builds_wire_settings() {
        let backend = Arc::new(MemoryBackend::new(8));
        let ctx = context(&backend);
        let mut view = AudioSettingsView::mount(ctx.clone()).await;

        view.set_voice_hold_step(20);
        view.set_fade_out_step(0);
        view.set_amplification(35);
        view.set_hysteresis(0.25, 0.5).unwrap();
        view.set_input_mode_index(1).unwrap();

        let settings = view.apply().await.unwrap();
        assert_eq!(
            serde_json::to_value(settings).unwrap(),
            serde_json::json!({
                "amplification": 20.0,
                "input_mode": "PushToTalk",
                "voice_activation_options": {
                    "voice_hold": 38,
                    "fade_out_duration": 1,
                    "voice_hysteresis_lower_threshold": 0.25,
                    "voice_hysteresis_upper_threshold": 0.5
                }
            })
        );

        assert_eq!(backend.applied_audio_settings(), vec![settings]);
        let saved = backend.saved_settings(SettingsName::AudioInput).unwrap();
        assert_eq!(
            FrontendSettings::from_payload(&saved).unwrap(),
            FrontendSettings::AudioInput(settings)
        );
        assert_eq!(ctx.store().settings().audio_input, Some(settings));
        view.unmount().await;
    }

    #[tokio::test]
    async fn test_apply_failure_is_shown_inline() {
        let backend = Arc::new(MemoryBackend::new(8));
        let ctx = context(&backend);
        let mut view = AudioSettingsView::mount(ctx.clone()).await;

        backend.reject_calls(Some("audio engine down"));
        assert!(view.apply().await.is_err());
        assert!(view.error_message().unwrap().contains("audio engine down"));
        // the UI-local copy is still updated
        assert!(ctx.store().settings().audio_input.is_some());

        backend.reject_calls(None);
        view.apply().await.unwrap();
        assert!(view.error_message().is_none());
        view.unmount().await;
    }

    #[tokio::test]
    async fn test_mount_restores_sliders_from_store() {
        let backend = Arc::new(MemoryBackend::new(8));
        let ctx = context(&backend);
        let stored = AudioInputSettings {
            amplification: 4.0,
            input_mode: InputMode::PushToTalk,
            voice_activation_options: VoiceActivationOptions {
                voice_hold: slider_to_millis(30),
                fade_out_duration: slider_to_millis(45),
                voice_hysteresis_lower_threshold: 0.3,
                voice_hysteresis_upper_threshold: 0.7,
            },
        };
        ctx.store()
            .update_settings_subtree(FrontendSettings::AudioInput(stored));

        let view = AudioSettingsView::mount(ctx).await;
        assert_eq!(view.build_settings(), stored);
        assert!(!view.shows_voice_activation());
        view.unmount().await;
    }

    #[tokio::test]
    async fn test_control_bounds() {
        let backend = Arc::new(MemoryBackend::new(8));
        let mut view = AudioSettingsView::mount(context(&backend)).await;

        view.set_voice_hold_step(500);
        assert_eq!(view.voice_hold_step(), TIME_SLIDER_MAX);

        view.set_hysteresis(0.9, 0.4).unwrap();
        assert_eq!(view.hysteresis(), (0.4, 0.4));
        view.set_hysteresis(-1.0, 2.0).unwrap();
        assert_eq!(view.hysteresis(), (0.0, 1.0));
        assert!(view.set_hysteresis(f32::NAN, 0.5).is_err());

        assert!(view.set_input_mode_index(7).is_err());
        assert_eq!(view.input_mode(), InputMode::VoiceActivation);
        view.unmount().await;
    }

    #[tokio::test]
    async fn test_device_selection() {
        let backend =
            Arc::new(MemoryBackend::new(8).with_devices(["Built-in Mic", "USB Headset"]));
        let mut view = AudioSettingsView::mount(context(&backend)).await;

        assert!(view.select_input_device(Some("USB Headset")).is_err());
        view.refresh_devices().await.unwrap();
        view.select_input_device(Some("USB Headset")).unwrap();
        assert_eq!(view.input_device(), Some("USB Headset"));

        backend.set_devices(["Built-in Mic"]);
        view.refresh_devices().await.unwrap();
        assert_eq!(view.input_device(), None);
        assert_eq!(view.devices(), ["Built-in Mic".to_string()]);
        view.unmount().await;
    }

    #[tokio::test]
    async fn test_mount_without_level_stream() {
        let backend = Arc::new(MemoryBackend::new(8));
        backend.reject_calls(Some("no capture device"));

        let mut view = AudioSettingsView::mount(context(&backend)).await;
        assert!(!view.is_metering());
        assert!(view.error_message().is_some());
        assert_eq!(view.pump_audio_level(), 0);
        view.unmount().await;
        assert_eq!(backend.disable_calls(), 0);
    }
}
