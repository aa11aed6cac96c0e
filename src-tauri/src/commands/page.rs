use tauri::{AppHandle, Manager, WebviewWindow};

use crate::menu::thumbar;
use crate::player::{PlaybackState, PlayerCommand};
use crate::relay::{self, scripts, ProbeReport};
use crate::state::AppContext;
use crate::window_manager::MAIN_WINDOW_LABEL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Play/pause was clicked in the page; carries the new playback flag
    Toggled(bool),
    /// A skip control was clicked, which needs no host state change
    Observed(PlayerCommand),
    /// A relay script could not find the element it needed
    RelayError(String),
    Unknown(String),
}

/// Apply one page notification to the host state
pub fn apply_notification(
    playback: &PlaybackState,
    message: &str,
    detail: Option<&str>,
) -> NotificationOutcome {
    if message == scripts::RELAY_ERROR_MESSAGE {
        let selector = detail.unwrap_or("<unknown>").to_string();
        log::error!("[RELAY] Page control {} not found, player markup may have changed", selector);
        return NotificationOutcome::RelayError(selector);
    }

    match message.parse::<PlayerCommand>() {
        Ok(PlayerCommand::PlayPause) => NotificationOutcome::Toggled(playback.toggle()),
        Ok(command) => {
            log::debug!("[RELAY] Page reported {}", command);
            NotificationOutcome::Observed(command)
        }
        Err(e) => {
            log::warn!("[RELAY] {}", e);
            NotificationOutcome::Unknown(message.to_string())
        }
    }
}

#[tauri::command]
pub fn page_notification(
    app: AppHandle,
    window: WebviewWindow,
    message: String,
    detail: Option<String>,
) -> Result<(), String> {
    if window.label() != MAIN_WINDOW_LABEL {
        return Err(format!("Unexpected notification from window {}", window.label()));
    }

    let ctx = app.state::<AppContext>();
    if let NotificationOutcome::Toggled(playing) =
        apply_notification(&ctx.playback, &message, detail.as_deref())
    {
        log::info!("[RELAY] Playback toggled, playing: {}", playing);
        thumbar::refresh(&window, ctx.capabilities, playing);
    }

    Ok(())
}

#[tauri::command]
pub fn relay_probe(app: AppHandle, window: WebviewWindow, report: ProbeReport) -> Result<(), String> {
    if window.label() != MAIN_WINDOW_LABEL {
        return Err(format!("Unexpected probe from window {}", window.label()));
    }

    let ctx = app.state::<AppContext>();
    relay::handle_probe(&window, &ctx.relay, &report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_pause_toggles_flag() {
        let playback = PlaybackState::new();
        assert_eq!(
            apply_notification(&playback, "playPause", None),
            NotificationOutcome::Toggled(true)
        );
        assert_eq!(
            apply_notification(&playback, "playPause", None),
            NotificationOutcome::Toggled(false)
        );
    }

    #[test]
    fn test_skip_notifications_leave_flag_alone() {
        let playback = PlaybackState::new();
        assert_eq!(
            apply_notification(&playback, "skipForward", None),
            NotificationOutcome::Observed(PlayerCommand::SkipForward)
        );
        assert_eq!(
            apply_notification(&playback, "skipBack", None),
            NotificationOutcome::Observed(PlayerCommand::SkipBack)
        );
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_relay_error_reports_selector() {
        let playback = PlaybackState::new();
        assert_eq!(
            apply_notification(&playback, "relayError", Some(".skip_back_button")),
            NotificationOutcome::RelayError(".skip_back_button".to_string())
        );
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_unknown_message() {
        let playback = PlaybackState::new();
        assert_eq!(
            apply_notification(&playback, "volumeUp", None),
            NotificationOutcome::Unknown("volumeUp".to_string())
        );
    }
}
