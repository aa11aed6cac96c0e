use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::cli::LaunchArgs;
use crate::platform::PlatformCapabilities;
use crate::player::PlaybackState;
use crate::relay::{PageRelay, RelayConfig};

/// Application context - managed by Tauri (runtime state only).
///
/// Every handler that needs shared state (lifecycle, hotkeys, menus, IPC
/// commands) reaches it through `app.state::<AppContext>()`.
pub struct AppContext {
    pub capabilities: PlatformCapabilities,
    pub launch: LaunchArgs,
    pub always_on_top: bool,
    pub playback: PlaybackState,
    pub relay: Arc<Mutex<PageRelay>>,
    /// Set once the window has been shown for the first finished page load
    pub revealed: AtomicBool,
    update_checked: AtomicBool,
}

impl AppContext {
    pub fn new(
        capabilities: PlatformCapabilities,
        launch: LaunchArgs,
        always_on_top: bool,
        relay_config: RelayConfig,
    ) -> Self {
        Self {
            capabilities,
            launch,
            always_on_top,
            playback: PlaybackState::new(),
            relay: Arc::new(Mutex::new(PageRelay::new(relay_config))),
            revealed: AtomicBool::new(false),
            update_checked: AtomicBool::new(false),
        }
    }

    /// True for the first caller only, so the update check runs once per process
    pub fn claim_update_check(&self) -> bool {
        !self.update_checked.swap(true, Ordering::SeqCst)
    }
}
