//! In-memory stand-ins for the settings store, the main window and the player page.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::relay::{self, PageBridge, PageRelay, Presence, ProbeReport};
use crate::settings::{SettingsStore, WindowPlacement};
use crate::window_manager::MainWindow;

/// Settings store backed by a HashMap
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MemoryStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Value) {
        self.values.lock().unwrap().insert(key.to_string(), value);
    }

    fn persist(&self) -> AppResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Main window whose geometry and flags the test drives directly
pub struct FakeWindow {
    pub placement: Mutex<WindowPlacement>,
    pub maximized: AtomicBool,
    pub fullscreen: AtomicBool,
    pub minimized: AtomicBool,
    pub visible: AtomicBool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeWindow {
    pub fn new(placement: WindowPlacement) -> Self {
        Self {
            placement: Mutex::new(placement),
            maximized: AtomicBool::new(false),
            fullscreen: AtomicBool::new(false),
            minimized: AtomicBool::new(false),
            visible: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn move_to(&self, placement: WindowPlacement) {
        *self.placement.lock().unwrap() = placement;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MainWindow for FakeWindow {
    fn current_placement(&self) -> AppResult<WindowPlacement> {
        Ok(*self.placement.lock().unwrap())
    }

    fn is_zoomed(&self) -> bool {
        self.maximized.load(Ordering::SeqCst) || self.fullscreen.load(Ordering::SeqCst)
    }

    fn is_minimized_window(&self) -> bool {
        self.minimized.load(Ordering::SeqCst)
    }

    fn unminimize_window(&self) -> AppResult<()> {
        self.record("unminimize");
        self.minimized.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn show_and_focus(&self) -> AppResult<()> {
        self.record("show_and_focus");
        self.visible.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn hide_window(&self) -> AppResult<()> {
        self.record("hide");
        self.visible.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn minimize_window(&self) -> AppResult<()> {
        self.record("minimize");
        self.minimized.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Page bridge that only records the scripts it was asked to run
#[derive(Clone, Default)]
pub struct RecordingBridge {
    scripts: Arc<Mutex<Vec<String>>>,
}

impl RecordingBridge {
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.scripts().iter().filter(|s| s.contains(needle)).count()
    }
}

impl PageBridge for RecordingBridge {
    fn run_script(&self, script: &str) -> AppResult<()> {
        self.scripts.lock().unwrap().push(script.to_string());
        Ok(())
    }
}

/// Bridge whose webview is gone
pub struct ClosedBridge;

impl PageBridge for ClosedBridge {
    fn run_script(&self, _script: &str) -> AppResult<()> {
        Err(AppError::Window("webview closed".to_string()))
    }
}

/// Simulated player page: answers probe scripts the way the real probe would,
/// with the player container turning visible on probe number `visible_on`.
#[derive(Clone)]
pub struct FakePage {
    pub bridge: RecordingBridge,
    relay: Arc<Mutex<PageRelay>>,
    visible_on: Option<u32>,
    probes: Arc<AtomicU32>,
}

impl FakePage {
    pub fn new(relay: Arc<Mutex<PageRelay>>, visible_on: Option<u32>) -> Self {
        Self {
            bridge: RecordingBridge::default(),
            relay,
            visible_on,
            probes: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }
}

impl PageBridge for FakePage {
    fn run_script(&self, script: &str) -> AppResult<()> {
        self.bridge.run_script(script)?;

        if script.contains(relay::scripts::PROBE_COMMAND) {
            let probe = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
            let player = match self.visible_on {
                Some(n) if probe >= n => Presence::Visible,
                _ => Presence::Hidden,
            };
            let report = ProbeReport {
                generation: relay::lock_relay(&self.relay).generation(),
                player,
                missing_controls: Vec::new(),
            };
            relay::handle_probe(self, &self.relay, &report);
        }
        Ok(())
    }
}
