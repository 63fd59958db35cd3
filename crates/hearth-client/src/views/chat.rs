use hearth_shared::constants::{CMD_GET_FRONTEND_SETTINGS, CMD_SET_AUDIO_INPUT_SETTING};
use hearth_shared::settings::{FrontendSettings, SettingsName};
use tracing::{debug, info, warn};

use crate::state::ClientContext;

/// Main chat screen.
pub struct ChatView {
    ctx: ClientContext,
    show_log: bool,
}

impl ChatView {
    /// Mount the chat screen: pull the stored frontend settings into the
    /// store and re-apply the saved audio configuration to the backend.
    ///
    /// Mounting never fails. Unreachable or corrupt settings leave the store
    /// defaults in place.
    pub async fn mount(ctx: ClientContext) -> Self {
        load_settings(&ctx, SettingsName::General).await;

        if let Some(FrontendSettings::AudioInput(audio)) =
            load_settings(&ctx, SettingsName::AudioInput).await
        {
            if ctx
                .call(
                    CMD_SET_AUDIO_INPUT_SETTING,
                    ctx.backend().set_audio_input_setting(audio),
                )
                .await
                .is_ok()
            {
                info!(mode = ?audio.input_mode, "Restored audio input settings");
            }
        }

        Self {
            ctx,
            show_log: false,
        }
    }

    pub fn show_log(&self) -> bool {
        self.show_log
    }

    pub fn set_show_log(&mut self, show: bool) {
        self.show_log = show;
    }

    pub fn toggle_log(&mut self) -> bool {
        self.show_log = !self.show_log;
        self.show_log
    }

    /// Whether a new message should scroll the message list down, given
    /// whether the list is currently scrolled to the bottom.
    pub fn should_autoscroll(&self, at_bottom: bool) -> bool {
        let advanced = self.ctx.store().settings().advanced_settings;
        if !advanced.autoscroll() {
            return false;
        }
        at_bottom || advanced.always_scroll_down_effective()
    }
}

/// Fetch one settings subtree from the backend and put it into the store.
///
/// Returns `None`, after logging, when the call fails or the payload does
/// not parse; a missing or corrupt subtree behaves like no settings at all.
pub async fn load_settings(ctx: &ClientContext, name: SettingsName) -> Option<FrontendSettings> {
    let raw = ctx
        .call(
            CMD_GET_FRONTEND_SETTINGS,
            ctx.backend().get_frontend_settings(name),
        )
        .await
        .ok()?;

    let settings = match FrontendSettings::from_payload(&raw) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(settings = %name, error = %e, "Ignoring malformed settings payload");
            return None;
        }
    };

    if settings.settings_name() != name {
        warn!(
            requested = %name,
            received = %settings.settings_name(),
            "Backend returned a different settings subtree"
        );
    }

    debug!(settings = %name, "Loaded frontend settings");
    ctx.store().update_settings_subtree(settings);
    Some(settings)
}
