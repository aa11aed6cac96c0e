use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tauri::{Runtime, WebviewWindow};

use super::state::{PageRelay, ProbeReport, ProbeStep};
use crate::error::AppResult;
use crate::player::PlayerCommand;

/// Evaluates relay scripts inside the player page
pub trait PageBridge {
    fn run_script(&self, script: &str) -> AppResult<()>;
}

impl<R: Runtime> PageBridge for WebviewWindow<R> {
    fn run_script(&self, script: &str) -> AppResult<()> {
        self.eval(script)?;
        Ok(())
    }
}

pub(crate) fn lock_relay(relay: &Mutex<PageRelay>) -> MutexGuard<'_, PageRelay> {
    relay.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Relay `command` to the page. Returns false when it was dropped because the
/// controls are not bound yet.
pub fn send_command(
    bridge: &impl PageBridge,
    relay: &Mutex<PageRelay>,
    command: PlayerCommand,
) -> bool {
    // Release the lock before touching the webview
    let script = lock_relay(relay).dispatch(command);

    match script {
        Some(script) => match bridge.run_script(&script) {
            Ok(()) => {
                log::info!("[RELAY] Sent {} to player", command);
                true
            }
            Err(e) => {
                log::warn!("[RELAY] Failed to send {} to player: {}", command, e);
                false
            }
        },
        None => false,
    }
}

/// Handle a probe report coming back from the page, attaching the click
/// forwarding when the player has just become available.
pub fn handle_probe(bridge: &impl PageBridge, relay: &Mutex<PageRelay>, report: &ProbeReport) {
    let attach = lock_relay(relay).on_probe(report);

    if let Some(script) = attach {
        if let Err(e) = bridge.run_script(&script) {
            log::error!("[RELAY] Failed to attach control listeners: {}", e);
        }
    }
}

/// Probe the page every poll interval until the relay binds, gives up, or a
/// newer page load takes over.
pub async fn poll_until_settled<B: PageBridge>(
    bridge: B,
    relay: Arc<Mutex<PageRelay>>,
    generation: u64,
) {
    let interval = lock_relay(&relay).config().poll_interval;

    loop {
        let step = lock_relay(&relay).next_probe(generation);
        match step {
            ProbeStep::Probe(script) => {
                if let Err(e) = bridge.run_script(&script) {
                    log::warn!("[RELAY] Probe failed: {}", e);
                }
            }
            ProbeStep::Finished => break,
        }

        // A report that arrived while the probe ran may already have settled things
        if !lock_relay(&relay).is_polling(generation) {
            break;
        }

        tokio::time::sleep(interval).await;
    }

    log::debug!(
        "[RELAY] Poll loop for page load {} finished: {}",
        generation,
        lock_relay(&relay).state()
    );
}
