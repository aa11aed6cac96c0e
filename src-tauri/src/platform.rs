//! Per-platform shell integration table.
//!
//! Lifecycle code asks this table what the current platform supports instead of
//! branching on the target OS at each call site.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Transport menu attached to the persistent dock icon
    pub dock_menu: bool,
    /// Skip/play/pause buttons in the taskbar thumbnail preview
    pub taskbar_buttons: bool,
    /// Closing the last window ends the process (otherwise the app stays resident)
    pub quits_on_window_close: bool,
    /// Updates arrive through the OS package manager, so the app never checks itself
    pub self_managed_updates: bool,
}

impl PlatformCapabilities {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::MacOs => Self {
                dock_menu: true,
                taskbar_buttons: false,
                quits_on_window_close: false,
                self_managed_updates: false,
            },
            Platform::Windows => Self {
                dock_menu: false,
                taskbar_buttons: true,
                quits_on_window_close: true,
                self_managed_updates: false,
            },
            Platform::Linux => Self {
                dock_menu: false,
                taskbar_buttons: false,
                quits_on_window_close: true,
                self_managed_updates: true,
            },
        }
    }

    pub fn current() -> Self {
        Self::for_platform(Platform::current())
    }
}
