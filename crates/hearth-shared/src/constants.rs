/// Application name
pub const APP_NAME: &str = "Hearth";

/// Backend commands
pub const CMD_GET_FRONTEND_SETTINGS: &str = "get_frontend_settings";
pub const CMD_SAVE_FRONTEND_SETTINGS: &str = "save_frontend_settings";
pub const CMD_SET_AUDIO_INPUT_SETTING: &str = "set_audio_input_setting";
pub const CMD_GET_AUDIO_DEVICES: &str = "get_audio_devices";
pub const CMD_ENABLE_AUDIO_INFO: &str = "enable_audio_info";
pub const CMD_DISABLE_AUDIO_INFO: &str = "disable_audio_info";
pub const CMD_OPEN_IN_BROWSER: &str = "open_in_browser";

/// Settings names understood by the backend's settings storage
pub const SETTINGS_GENERAL: &str = "general";
pub const SETTINGS_AUDIO_INPUT: &str = "audio_input";

/// Base of the exponential hold/fade slider curve
pub const TIME_SCALE_BASE: f64 = 1.2;

/// Hold and fade-out sliders run from 0 to 60 in steps of 1
pub const TIME_SLIDER_MIN: u32 = 0;
pub const TIME_SLIDER_MAX: u32 = 60;

/// Amplification slider range in dB
pub const AMPLIFICATION_MIN_DB: u32 = 0;
pub const AMPLIFICATION_MAX_DB: u32 = 20;

/// Default slider positions of the audio settings screen
pub const DEFAULT_VOICE_HOLD_STEP: u32 = 10;
pub const DEFAULT_FADE_OUT_STEP: u32 = 10;
pub const DEFAULT_AMPLIFICATION_DB: u32 = 10;
pub const DEFAULT_HYSTERESIS: (f32, f32) = (0.1, 0.2);
