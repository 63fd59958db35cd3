//! Frontend settings subtrees.
//!
//! The backend persists each subtree under a settings name and hands it back
//! as an externally tagged envelope, e.g. `{"AudioInput": {...}}`. Those
//! envelopes map directly onto [`FrontendSettings`].

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AMPLIFICATION_DB, DEFAULT_FADE_OUT_STEP, DEFAULT_HYSTERESIS, DEFAULT_VOICE_HOLD_STEP,
    SETTINGS_AUDIO_INPUT, SETTINGS_GENERAL,
};
use crate::timescale::slider_to_millis;

/// Name under which the backend stores a settings subtree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SettingsName {
    General,
    AudioInput,
}

impl SettingsName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => SETTINGS_GENERAL,
            Self::AudioInput => SETTINGS_AUDIO_INPUT,
        }
    }
}

impl std::fmt::Display for SettingsName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI toggles from the advanced settings screen.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
    #[serde(default)]
    pub disable_autoscroll: bool,
    #[serde(default)]
    pub always_scroll_down: bool,
}

impl AdvancedSettings {
    /// Whether the chat view should scroll on new messages at all.
    pub fn autoscroll(&self) -> bool {
        !self.disable_autoscroll
    }

    /// "Always scroll down" only has an effect while autoscroll is on.
    pub fn always_scroll_down_effective(&self) -> bool {
        self.autoscroll() && self.always_scroll_down
    }
}

/// How the microphone decides when to transmit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[repr(u8)]
pub enum InputMode {
    #[default]
    VoiceActivation = 0,
    PushToTalk = 1,
}

impl InputMode {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::VoiceActivation),
            1 => Some(Self::PushToTalk),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VoiceActivationOptions {
    /// Milliseconds the gate stays open after the level drops.
    pub voice_hold: u64,
    /// Milliseconds over which the signal fades out once the hold ends.
    pub fade_out_duration: u64,
    pub voice_hysteresis_lower_threshold: f32,
    pub voice_hysteresis_upper_threshold: f32,
}

impl Default for VoiceActivationOptions {
    fn default() -> Self {
        Self {
            voice_hold: slider_to_millis(DEFAULT_VOICE_HOLD_STEP),
            fade_out_duration: slider_to_millis(DEFAULT_FADE_OUT_STEP),
            voice_hysteresis_lower_threshold: DEFAULT_HYSTERESIS.0,
            voice_hysteresis_upper_threshold: DEFAULT_HYSTERESIS.1,
        }
    }
}

/// Audio capture parameters applied live by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AudioInputSettings {
    /// Input gain in dB.
    pub amplification: f32,
    pub input_mode: InputMode,
    pub voice_activation_options: VoiceActivationOptions,
}

impl Default for AudioInputSettings {
    fn default() -> Self {
        Self {
            amplification: DEFAULT_AMPLIFICATION_DB as f32,
            input_mode: InputMode::default(),
            voice_activation_options: VoiceActivationOptions::default(),
        }
    }
}

/// A single settings subtree, tagged with the subtree it belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum FrontendSettings {
    AudioInput(AudioInputSettings),
    AdvancedSettings(AdvancedSettings),
}

impl FrontendSettings {
    pub fn settings_name(&self) -> SettingsName {
        match self {
            Self::AudioInput(_) => SettingsName::AudioInput,
            Self::AdvancedSettings(_) => SettingsName::General,
        }
    }

    /// Parse an envelope as returned by `get_frontend_settings`.
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The full settings tree held by the store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsTree {
    #[serde(rename = "advancedSettings", default)]
    pub advanced_settings: AdvancedSettings,
    /// `None` until the backend has delivered audio settings.
    #[serde(default)]
    pub audio_input: Option<AudioInputSettings>,
}

impl SettingsTree {
    /// Replace the subtree named by `value`. Other subtrees are untouched.
    pub fn replace(&mut self, value: FrontendSettings) {
        match value {
            FrontendSettings::AudioInput(audio) => self.audio_input = Some(audio),
            FrontendSettings::AdvancedSettings(advanced) => self.advanced_settings = advanced,
        }
    }

    pub fn get(&self, name: SettingsName) -> Option<FrontendSettings> {
        match name {
            SettingsName::General => Some(FrontendSettings::AdvancedSettings(self.advanced_settings)),
            SettingsName::AudioInput => self.audio_input.map(FrontendSettings::AudioInput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_input_envelope_shape() {
        let settings = FrontendSettings::AudioInput(AudioInputSettings {
            amplification: 4.0,
            input_mode: InputMode::PushToTalk,
            voice_activation_options: VoiceActivationOptions {
                voice_hold: 6,
                fade_out_duration: 38,
                voice_hysteresis_lower_threshold: 0.25,
                voice_hysteresis_upper_threshold: 0.5,
            },
        });

        let value = serde_json::to_value(settings).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "AudioInput": {
                    "amplification": 4.0,
                    "input_mode": "PushToTalk",
                    "voice_activation_options": {
                        "voice_hold": 6,
                        "fade_out_duration": 38,
                        "voice_hysteresis_lower_threshold": 0.25,
                        "voice_hysteresis_upper_threshold": 0.5
                    }
                }
            })
        );
    }

    #[test]
    fn test_advanced_settings_camel_case() {
        let parsed =
            FrontendSettings::from_payload(r#"{"AdvancedSettings":{"disableAutoscroll":true}}"#)
                .unwrap();
        assert_eq!(
            parsed,
            FrontendSettings::AdvancedSettings(AdvancedSettings {
                disable_autoscroll: true,
                always_scroll_down: false,
            })
        );
        assert_eq!(parsed.settings_name(), SettingsName::General);
    }

    #[test]
    fn test_always_scroll_down_needs_autoscroll() {
        let settings = AdvancedSettings {
            disable_autoscroll: true,
            always_scroll_down: true,
        };
        assert!(!settings.always_scroll_down_effective());

        let settings = AdvancedSettings {
            disable_autoscroll: false,
            always_scroll_down: true,
        };
        assert!(settings.always_scroll_down_effective());
    }

    #[test]
    fn test_replace_touches_one_subtree() {
        let mut tree = SettingsTree::default();
        let advanced = AdvancedSettings {
            disable_autoscroll: true,
            always_scroll_down: false,
        };
        tree.replace(FrontendSettings::AdvancedSettings(advanced));
        assert_eq!(tree.audio_input, None);

        let audio = AudioInputSettings::default();
        tree.replace(FrontendSettings::AudioInput(audio));
        assert_eq!(tree.advanced_settings, advanced);
        assert_eq!(tree.get(SettingsName::AudioInput), Some(FrontendSettings::AudioInput(audio)));
    }

    #[test]
    fn test_input_mode_index() {
        assert_eq!(InputMode::from_index(0), Some(InputMode::VoiceActivation));
        assert_eq!(InputMode::from_index(1), Some(InputMode::PushToTalk));
        assert_eq!(InputMode::from_index(2), None);
        assert_eq!(InputMode::PushToTalk.index(), 1);
    }

    #[test]
    fn test_defaults_follow_slider_curve() {
        let defaults = AudioInputSettings::default();
        assert_eq!(defaults.amplification, 10.0);
        assert_eq!(defaults.voice_activation_options.voice_hold, 6);
        assert_eq!(defaults.voice_activation_options.fade_out_duration, 6);
    }
}
