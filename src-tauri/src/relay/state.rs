use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::scripts;
use crate::player::PlayerCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    pub poll_interval: Duration,
    /// Probes to run before giving up, `None` polls until the player shows up
    pub max_attempts: Option<u32>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_attempts: Some(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Presence {
    Missing,
    Hidden,
    Visible,
}

/// What the probe script found in the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub generation: u64,
    pub player: Presence,
    #[serde(default)]
    pub missing_controls: Vec<String>,
}

impl ProbeReport {
    pub fn is_ready(&self) -> bool {
        self.player == Presence::Visible && self.missing_controls.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Unbound { attempts: u32 },
    Bound,
    GaveUp,
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayState::Unbound { attempts } => write!(f, "unbound ({} probes)", attempts),
            RelayState::Bound => f.write_str("bound"),
            RelayState::GaveUp => f.write_str("gave up"),
        }
    }
}

/// Next thing the poll loop should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStep {
    Probe(String),
    Finished,
}

/// Readiness state of the player page for the current page load.
///
/// Every page load gets a new generation. Probe reports and poll loops that
/// belong to an older generation are ignored.
#[derive(Debug)]
pub struct PageRelay {
    config: RelayConfig,
    state: RelayState,
    generation: u64,
}

impl PageRelay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            state: RelayState::Unbound { attempts: 0 },
            generation: 0,
        }
    }

    pub fn config(&self) -> RelayConfig {
        self.config
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_bound(&self) -> bool {
        self.state == RelayState::Bound
    }

    /// Whether the poll loop of `generation` still has work to do
    pub fn is_polling(&self, generation: u64) -> bool {
        generation == self.generation && matches!(self.state, RelayState::Unbound { .. })
    }

    /// Start over for a new page load and return its generation
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.state = RelayState::Unbound { attempts: 0 };
        log::debug!("[RELAY] Page load {} started, relay unbound", self.generation);
        self.generation
    }

    /// Advance the poll loop of `generation` by one tick.
    pub fn next_probe(&mut self, generation: u64) -> ProbeStep {
        if generation != self.generation {
            log::debug!(
                "[RELAY] Poll loop for page load {} superseded by {}",
                generation,
                self.generation
            );
            return ProbeStep::Finished;
        }

        match self.state {
            RelayState::Unbound { attempts } => {
                if let Some(max) = self.config.max_attempts {
                    if attempts >= max {
                        log::error!(
                            "[RELAY] Player never became available after {} checks, giving up",
                            attempts
                        );
                        self.state = RelayState::GaveUp;
                        return ProbeStep::Finished;
                    }
                }
                self.state = RelayState::Unbound {
                    attempts: attempts + 1,
                };
                ProbeStep::Probe(scripts::probe_script(self.generation))
            }
            RelayState::Bound | RelayState::GaveUp => ProbeStep::Finished,
        }
    }

    /// Feed a probe report in. Returns the attach script when this report binds the relay.
    pub fn on_probe(&mut self, report: &ProbeReport) -> Option<String> {
        if report.generation != self.generation {
            log::debug!(
                "[RELAY] Dropping probe from page load {} (current {})",
                report.generation,
                self.generation
            );
            return None;
        }

        match self.state {
            RelayState::Unbound { attempts } => {
                if report.is_ready() {
                    log::info!("[RELAY] Player available after {} checks, binding controls", attempts);
                    self.state = RelayState::Bound;
                    return Some(scripts::attach_script(self.generation));
                }

                match report.player {
                    Presence::Missing => {
                        log::warn!("[RELAY] Player container {} not found", scripts::PLAYER_CONTAINER_SELECTOR)
                    }
                    Presence::Hidden => log::debug!("[RELAY] Player still hidden, rechecking"),
                    Presence::Visible => log::warn!(
                        "[RELAY] Player visible but controls missing: {}",
                        report.missing_controls.join(", ")
                    ),
                }
                None
            }
            RelayState::Bound => {
                log::debug!("[RELAY] Already bound, ignoring probe");
                None
            }
            RelayState::GaveUp => None,
        }
    }

    /// Script that performs `command` in the page, or `None` while the controls are not bound.
    pub fn dispatch(&self, command: PlayerCommand) -> Option<String> {
        if self.is_bound() {
            Some(scripts::click_script(command))
        } else {
            log::debug!("[RELAY] Dropping {} while relay is {}", command, self.state);
            None
        }
    }
}
