use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tauri::Runtime;
use tauri_plugin_store::Store;

use crate::error::AppResult;
use crate::relay::RelayConfig;

pub const STORE_FILE: &str = "config.json";

const KEY_LAST_WINDOW_STATE: &str = "lastWindowState";
const KEY_ALWAYS_ON_TOP: &str = "alwaysOnTop";
const KEY_RELAY_POLL_INTERVAL_MS: &str = "relayPollIntervalMs";
const KEY_RELAY_MAX_ATTEMPTS: &str = "relayMaxAttempts";

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Key/value persistence behind the user configuration.
///
/// Implemented for the tauri-plugin-store `Store` at runtime and by an
/// in-memory map in tests.
pub trait SettingsStore {
    fn get_value(&self, key: &str) -> Option<Value>;
    fn set_value(&self, key: &str, value: Value);
    fn persist(&self) -> AppResult<()>;
}

impl<R: Runtime> SettingsStore for Store<R> {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    fn set_value(&self, key: &str, value: Value) {
        self.set(key, value);
    }

    fn persist(&self) -> AppResult<()> {
        self.save()?;
        Ok(())
    }
}

/// Last known bounds of the main window, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlacement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub last_window_state: Option<WindowPlacement>,
    pub always_on_top: bool,
    pub relay: RelayConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_window_state: None, // OS picks the position, size falls back to defaults
            always_on_top: false,
            relay: RelayConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(store: &impl SettingsStore) -> Self {
        let defaults = Settings::default();

        let last_window_state = store.get_value(KEY_LAST_WINDOW_STATE).and_then(|v| {
            match serde_json::from_value::<WindowPlacement>(v) {
                Ok(placement) if placement.width > 0 && placement.height > 0 => Some(placement),
                Ok(_) => {
                    log::warn!("[SETTINGS] Ignoring zero-sized window placement");
                    None
                }
                Err(e) => {
                    log::warn!("[SETTINGS] Ignoring malformed window placement: {}", e);
                    None
                }
            }
        });

        let always_on_top = store
            .get_value(KEY_ALWAYS_ON_TOP)
            .and_then(|v| v.as_bool())
            .unwrap_or(defaults.always_on_top);

        let poll_interval = store
            .get_value(KEY_RELAY_POLL_INTERVAL_MS)
            .and_then(|v| v.as_u64())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.relay.poll_interval);

        // 0 means keep polling forever
        let max_attempts = match store.get_value(KEY_RELAY_MAX_ATTEMPTS).and_then(|v| v.as_u64()) {
            Some(0) => None,
            Some(n) => Some(u32::try_from(n).unwrap_or(u32::MAX)),
            None => defaults.relay.max_attempts,
        };

        Self {
            last_window_state,
            always_on_top,
            relay: RelayConfig {
                poll_interval,
                max_attempts,
            },
        }
    }
}

/// Write the window placement record and the always-on-top preference.
pub fn save_window_state(
    store: &impl SettingsStore,
    placement: Option<WindowPlacement>,
    always_on_top: bool,
) -> AppResult<()> {
    if let Some(placement) = placement {
        store.set_value(KEY_LAST_WINDOW_STATE, json!(placement));
    }
    store.set_value(KEY_ALWAYS_ON_TOP, json!(always_on_top));
    store.persist()
}
