use hearth_shared::constants::CMD_SAVE_FRONTEND_SETTINGS;
use hearth_shared::settings::{AdvancedSettings, FrontendSettings, SettingsName};
use tracing::info;

use crate::error::Result;
use crate::state::ClientContext;

const ALWAYS_SCROLL_NEEDS_AUTOSCROLL: &str =
    "Enable auto-scroll before choosing to always scroll down";

/// Advanced settings screen: chat scrolling behaviour.
pub struct AdvancedSettingsView {
    ctx: ClientContext,
    error_message: Option<String>,
}

impl AdvancedSettingsView {
    pub fn new(ctx: ClientContext) -> Self {
        Self {
            ctx,
            error_message: None,
        }
    }

    pub fn settings(&self) -> AdvancedSettings {
        self.ctx.store().settings().advanced_settings
    }

    /// The "always scroll down" switch is disabled while autoscroll is off.
    pub fn always_scroll_down_enabled(&self) -> bool {
        self.settings().autoscroll()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_disable_autoscroll(&mut self, disable: bool) {
        let settings = AdvancedSettings {
            disable_autoscroll: disable,
            ..self.settings()
        };
        self.ctx
            .store()
            .update_settings_subtree(FrontendSettings::AdvancedSettings(settings));
        self.error_message = None;
    }

    /// Returns whether the change was accepted.
    pub fn set_always_scroll_down(&mut self, always: bool) -> bool {
        if !self.always_scroll_down_enabled() {
            self.error_message = Some(ALWAYS_SCROLL_NEEDS_AUTOSCROLL.to_string());
            return false;
        }

        let settings = AdvancedSettings {
            always_scroll_down: always,
            ..self.settings()
        };
        self.ctx
            .store()
            .update_settings_subtree(FrontendSettings::AdvancedSettings(settings));
        self.error_message = None;
        true
    }

    /// Persist the current toggles under the `general` settings name.
    pub async fn save(&mut self) -> Result<()> {
        let settings = FrontendSettings::AdvancedSettings(self.settings());
        let result = self
            .ctx
            .call(
                CMD_SAVE_FRONTEND_SETTINGS,
                self.ctx
                    .backend()
                    .save_frontend_settings(SettingsName::General, settings),
            )
            .await;

        match &result {
            Ok(()) => {
                self.error_message = None;
                info!("Advanced settings saved");
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
        result
    }
}
