//! Page relay: bridges host commands to the player page's own controls and
//! forwards clicks on those controls back to the host.
//!
//! The page gives no readiness signal, so the relay polls it. Each poll runs
//! a probe script. The probe reports back through the `relay_probe` command.
//! Once the player container is visible, the click listeners are attached
//! and commands start turning into synthetic clicks. Commands that arrive
//! before that are dropped.

mod bridge;
pub mod scripts;
mod state;

pub(crate) use bridge::lock_relay;
pub use bridge::{handle_probe, poll_until_settled, send_command, PageBridge};
pub use state::{PageRelay, Presence, ProbeReport, ProbeStep, RelayConfig, RelayState};
