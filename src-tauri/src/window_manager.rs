use std::sync::atomic::Ordering;

use tauri::webview::{PageLoadEvent, PageLoadPayload};
use tauri::{AppHandle, Manager, Runtime, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_store::StoreExt;

use crate::downloads;
use crate::error::{AppError, AppResult};
use crate::platform::PlatformCapabilities;
use crate::relay;
use crate::settings::{self, Settings, SettingsStore, WindowPlacement};
use crate::state::AppContext;

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const PLAYER_URL: &str = "https://play.pocketcasts.com/users/sign_in";

const MIN_WIDTH: f64 = 400.0;
const MIN_HEIGHT: f64 = 200.0;

/// The window operations lifecycle code needs, so close and surface handling
/// can run against a fake window in tests.
pub trait MainWindow {
    fn current_placement(&self) -> AppResult<WindowPlacement>;
    /// Maximized or full-screen
    fn is_zoomed(&self) -> bool;
    fn is_minimized_window(&self) -> bool;
    fn unminimize_window(&self) -> AppResult<()>;
    fn show_and_focus(&self) -> AppResult<()>;
    fn hide_window(&self) -> AppResult<()>;
    fn minimize_window(&self) -> AppResult<()>;
}

impl<R: Runtime> MainWindow for WebviewWindow<R> {
    fn current_placement(&self) -> AppResult<WindowPlacement> {
        let scale = self.scale_factor()?;
        let position = self.outer_position()?.to_logical::<f64>(scale);
        let size = self.inner_size()?.to_logical::<f64>(scale);

        Ok(WindowPlacement {
            x: position.x.round() as i32,
            y: position.y.round() as i32,
            width: size.width.round() as u32,
            height: size.height.round() as u32,
        })
    }

    fn is_zoomed(&self) -> bool {
        self.is_maximized().unwrap_or(false) || self.is_fullscreen().unwrap_or(false)
    }

    fn is_minimized_window(&self) -> bool {
        self.is_minimized().unwrap_or(false)
    }

    fn unminimize_window(&self) -> AppResult<()> {
        self.unminimize()?;
        Ok(())
    }

    fn show_and_focus(&self) -> AppResult<()> {
        self.show()?;
        self.set_focus()?;
        Ok(())
    }

    fn hide_window(&self) -> AppResult<()> {
        self.hide()?;
        Ok(())
    }

    fn minimize_window(&self) -> AppResult<()> {
        self.minimize()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Keep the process resident and only hide the window
    Hide,
    /// Let the window close, which ends the process
    Close,
}

pub fn get_main_window<R: Runtime>(app: &AppHandle<R>) -> Option<WebviewWindow<R>> {
    app.get_webview_window(MAIN_WINDOW_LABEL)
}

/// Size and position the main window opens with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialGeometry {
    pub width: u32,
    pub height: u32,
    /// `None` opens the window centered
    pub position: Option<(i32, i32)>,
}

/// Restore the saved placement, or open a default-sized centered window
pub fn initial_geometry(settings: &Settings) -> InitialGeometry {
    match settings.last_window_state {
        Some(placement) => InitialGeometry {
            width: placement.width,
            height: placement.height,
            position: Some((placement.x, placement.y)),
        },
        None => InitialGeometry {
            width: settings::DEFAULT_WIDTH,
            height: settings::DEFAULT_HEIGHT,
            position: None,
        },
    }
}

/// Build the hidden player window from the saved settings.
///
/// It becomes visible on the first finished page load.
pub fn create_main_window<R: Runtime>(
    app: &AppHandle<R>,
    settings: &Settings,
) -> AppResult<WebviewWindow<R>> {
    let url: Url = PLAYER_URL
        .parse()
        .map_err(|e| AppError::Window(format!("invalid player url: {}", e)))?;

    let geometry = initial_geometry(settings);

    let mut builder = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(url))
        .title(app.package_info().name.clone())
        .visible(false)
        .inner_size(f64::from(geometry.width), f64::from(geometry.height))
        .min_inner_size(MIN_WIDTH, MIN_HEIGHT)
        .always_on_top(settings.always_on_top)
        .on_page_load(handle_page_load)
        .on_download(downloads::handle_download);

    builder = match geometry.position {
        Some((x, y)) => builder.position(f64::from(x), f64::from(y)),
        None => builder.center(),
    };

    let window = builder.build()?;
    log::info!("[WINDOW] Main window created with {:?}", geometry);
    Ok(window)
}

fn handle_page_load<R: Runtime>(window: WebviewWindow<R>, payload: PageLoadPayload<'_>) {
    let Some(ctx) = window.try_state::<AppContext>() else {
        log::warn!("[WINDOW] Page load before app context was ready");
        return;
    };

    match payload.event() {
        PageLoadEvent::Started => {
            log::debug!("[WINDOW] Loading {}", payload.url());
            relay::lock_relay(&ctx.relay).reset();
        }
        PageLoadEvent::Finished => {
            log::info!("[WINDOW] Page loaded: {}", payload.url());

            if !ctx.revealed.swap(true, Ordering::SeqCst) {
                reveal(&window, ctx.launch.minimize);
                crate::menu::thumbar::install(&window, ctx.capabilities, ctx.playback.is_playing());
            }

            let generation = relay::lock_relay(&ctx.relay).generation();
            let relay_state = ctx.relay.clone();
            let bridge = window.clone();
            tauri::async_runtime::spawn(async move {
                relay::poll_until_settled(bridge, relay_state, generation).await;
            });
        }
    }
}

/// First appearance of the window once the player page has loaded
pub fn reveal(window: &impl MainWindow, start_minimized: bool) {
    let result = if start_minimized {
        window.show_and_focus().and_then(|_| window.minimize_window())
    } else {
        window.show_and_focus()
    };

    if let Err(e) = result {
        log::error!("[WINDOW] Failed to reveal main window: {}", e);
    }
}

/// Bring an already running instance to the front
pub fn surface(window: &impl MainWindow) -> AppResult<()> {
    if window.is_minimized_window() {
        window.unminimize_window()?;
    }
    window.show_and_focus()
}

/// A second launch was attempted; bring the running window forward.
///
/// Returns false when there was no window to surface yet.
pub fn on_second_instance(window: Option<&impl MainWindow>, args: &[String]) -> bool {
    log::info!("[WINDOW] Another instance attempted to start, args: {:?}", args);

    let Some(window) = window else {
        log::warn!("[WINDOW] Second launch before the main window existed");
        return false;
    };

    match surface(window) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[WINDOW] Failed to surface running instance: {}", e);
            false
        }
    }
}

/// Save the placement record unless the window is maximized, full-screen or
/// minimized, since those bounds are not the ones to restore.
pub fn persist_window_state(
    window: &impl MainWindow,
    store: &impl SettingsStore,
    always_on_top: bool,
) {
    let placement = if window.is_zoomed() || window.is_minimized_window() {
        log::debug!("[WINDOW] Window zoomed or minimized, keeping previous placement");
        None
    } else {
        match window.current_placement() {
            Ok(placement) => Some(placement),
            Err(e) => {
                log::warn!("[WINDOW] Could not read window bounds: {}", e);
                None
            }
        }
    };

    match settings::save_window_state(store, placement, always_on_top) {
        Ok(()) => log::debug!("[WINDOW] Saved window state {:?}", placement),
        Err(e) => log::error!("[WINDOW] Failed to save window state: {}", e),
    }
}

/// Persist state for a close request and decide what the close does.
pub fn on_close_requested(
    window: &impl MainWindow,
    store: &impl SettingsStore,
    capabilities: PlatformCapabilities,
    always_on_top: bool,
) -> CloseAction {
    persist_window_state(window, store, always_on_top);

    if capabilities.quits_on_window_close {
        CloseAction::Close
    } else {
        CloseAction::Hide
    }
}

/// Persist against the real settings store
pub fn save_main_window_state<R: Runtime>(app: &AppHandle<R>, window: &WebviewWindow<R>) {
    let Some(ctx) = app.try_state::<AppContext>() else {
        return;
    };

    match app.store(settings::STORE_FILE) {
        Ok(store) => persist_window_state(window, &*store, ctx.always_on_top),
        Err(e) => log::error!("[WINDOW] Settings store unavailable: {}", e),
    }
}
