//! Taskbar thumbnail toolbar: skip back, play, pause, skip forward.
//!
//! The layout comes from [`crate::player::thumb_buttons`]. Only the Win32
//! backend draws it.

use tauri::{Runtime, WebviewWindow};

use crate::platform::PlatformCapabilities;

#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
mod progress;
#[cfg(target_os = "windows")]
mod win32;

/// Add the toolbar to the main window and route its clicks to the player.
pub fn install<R: Runtime>(
    window: &WebviewWindow<R>,
    capabilities: PlatformCapabilities,
    playing: bool,
) {
    if !capabilities.taskbar_buttons {
        return;
    }

    #[cfg(target_os = "windows")]
    win32::install(window, playing);

    #[cfg(not(target_os = "windows"))]
    {
        let _ = (window, playing);
        log::debug!("[TASKBAR] Thumbnail toolbar not supported on this platform");
    }
}

/// Swap the play/pause pair after the playback flag changed.
pub fn refresh<R: Runtime>(
    window: &WebviewWindow<R>,
    capabilities: PlatformCapabilities,
    playing: bool,
) {
    if !capabilities.taskbar_buttons {
        return;
    }

    #[cfg(target_os = "windows")]
    win32::refresh(window, playing);

    #[cfg(not(target_os = "windows"))]
    {
        let _ = (window, playing);
    }
}
