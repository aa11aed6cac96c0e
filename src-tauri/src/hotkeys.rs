use tauri::{AppHandle, Runtime};
use tauri_plugin_global_shortcut::{Code, GlobalShortcut, Shortcut, ShortcutState};

use crate::error::AppResult;
use crate::player::PlayerCommand;

/// OS media keys and the command each one sends
pub const MEDIA_KEY_BINDINGS: [(Code, PlayerCommand); 3] = [
    (Code::MediaPlayPause, PlayerCommand::PlayPause),
    (Code::MediaTrackPrevious, PlayerCommand::SkipBack),
    (Code::MediaTrackNext, PlayerCommand::SkipForward),
];

/// Global hotkey registration, implemented by the global-shortcut plugin
#[cfg_attr(test, mockall::automock)]
pub trait ShortcutRegistrar {
    fn is_registered(&self, shortcut: Shortcut) -> bool;
    fn register(&self, shortcut: Shortcut) -> AppResult<()>;
    fn unregister(&self, shortcut: Shortcut) -> AppResult<()>;
}

impl<R: Runtime> ShortcutRegistrar for GlobalShortcut<R> {
    fn is_registered(&self, shortcut: Shortcut) -> bool {
        GlobalShortcut::is_registered(self, shortcut)
    }

    fn register(&self, shortcut: Shortcut) -> AppResult<()> {
        GlobalShortcut::register(self, shortcut)?;
        Ok(())
    }

    fn unregister(&self, shortcut: Shortcut) -> AppResult<()> {
        GlobalShortcut::unregister(self, shortcut)?;
        Ok(())
    }
}

pub fn media_shortcuts() -> impl Iterator<Item = Shortcut> {
    MEDIA_KEY_BINDINGS
        .into_iter()
        .map(|(code, _)| Shortcut::new(None, code))
}

/// Command bound to `shortcut`, if it is one of the media keys
pub fn command_for_shortcut(shortcut: &Shortcut) -> Option<PlayerCommand> {
    MEDIA_KEY_BINDINGS
        .into_iter()
        .find(|(code, _)| Shortcut::new(None, *code) == *shortcut)
        .map(|(_, command)| command)
}

/// (Re)bind the media keys.
///
/// Focus changes can silently revoke a grab on some platforms, so this runs on
/// every focus gain. Each key is released first and then taken again, so one
/// press never dispatches twice. Failures only get logged: another
/// application may hold the key, and the next focus event retries.
///
/// Returns how many keys are bound afterwards.
pub fn register_media_keys(registrar: &impl ShortcutRegistrar) -> usize {
    let mut bound = 0;

    for shortcut in media_shortcuts() {
        if registrar.is_registered(shortcut) {
            if let Err(e) = registrar.unregister(shortcut) {
                log::debug!("[HOTKEY] Could not release {:?} before rebinding: {}", shortcut.key, e);
            }
        }

        match registrar.register(shortcut) {
            Ok(()) => bound += 1,
            Err(e) => log::warn!("[HOTKEY] Media key {:?} unavailable: {}", shortcut.key, e),
        }
    }

    log::debug!("[HOTKEY] {} of {} media keys bound", bound, MEDIA_KEY_BINDINGS.len());
    bound
}

/// Entry point for the global-shortcut plugin handler
pub fn handle_global_shortcut<R: Runtime>(
    app: &AppHandle<R>,
    shortcut: &Shortcut,
    event_state: ShortcutState,
) {
    // Only act on the key going down
    if event_state != ShortcutState::Pressed {
        return;
    }

    match command_for_shortcut(shortcut) {
        Some(command) => {
            log::debug!("[HOTKEY] {:?} pressed -> {}", shortcut.key, command);
            crate::dispatch_command(app, command);
        }
        None => log::debug!("[HOTKEY] Ignoring unbound shortcut {:?}", shortcut),
    }
}
