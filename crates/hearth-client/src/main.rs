//! Headless session against the in-process backend: mounts the chat and
//! audio screens, replays a few roster events and logs the resulting state.

use std::sync::Arc;
use std::time::Duration;

use hearth_client::views::{AdvancedSettingsView, AudioSettingsView, ChatView};
use hearth_client::{spawn_event_bridge, BackendEvent, ClientConfig, ClientContext, MemoryBackend};
use hearth_shared::settings::{AudioInputSettings, FrontendSettings, SettingsName};
use hearth_shared::types::{User, UserId};
use hearth_store::Store;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hearth_client::init_logging();
    info!("Starting {} headless client", hearth_shared::constants::APP_NAME);

    let config = ClientConfig::from_env();
    let backend = Arc::new(
        MemoryBackend::new(config.event_buffer)
            .with_devices(["Built-in Microphone", "USB Headset"]),
    );
    backend.store_raw_settings(
        SettingsName::AudioInput,
        FrontendSettings::AudioInput(AudioInputSettings::default()).to_payload()?,
    );

    let store = Store::new();
    let _roster_log = store.subscribe(|change, state| {
        info!(?change, users = state.users().len(), "Store changed");
    });

    let ctx = ClientContext::new(store, backend.clone(), config);
    let bridge = spawn_event_bridge(&ctx);
    let chat = ChatView::mount(ctx.clone()).await;

    let mut me = User::new(1, "me");
    me.channel_id = 1;
    backend.emit(BackendEvent::ConnectionState(true));
    backend.emit(BackendEvent::UserUpdate(me));
    backend.emit(BackendEvent::UserUpdate(User::new(2, "guest")));
    backend.emit(BackendEvent::CurrentUser(UserId(1)));

    let mut audio = AudioSettingsView::mount(ctx.clone()).await;
    audio.refresh_devices().await?;
    audio.select_input_device(Some("USB Headset"))?;
    backend.emit_audio_level(0.42);
    if let Some(level) = audio.next_audio_level().await {
        info!(level, above = audio.level_above_threshold(), "Input level");
    }
    audio.set_voice_hold_step(25);
    audio.apply().await?;
    audio.unmount().await;

    let mut advanced = AdvancedSettingsView::new(ctx.clone());
    advanced.set_always_scroll_down(true);
    advanced.save().await?;

    // let the bridge drain what was emitted above
    tokio::time::sleep(Duration::from_millis(20)).await;

    info!(
        autoscroll_when_scrolled_up = chat.should_autoscroll(false),
        state = %serde_json::to_string(&ctx.store().snapshot().summary())?,
        "Session state"
    );

    bridge.abort();
    Ok(())
}
