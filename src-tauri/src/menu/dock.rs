use tauri::image::Image;
use tauri::menu::{MenuBuilder, MenuItem};
use tauri::tray::TrayIconBuilder;
use tauri::{AppHandle, Runtime};

use crate::error::AppResult;
use crate::platform::PlatformCapabilities;
use crate::player::PlayerCommand;

const TRAY_ID: &str = "transport";
const MENU_ID_SHOW: &str = "show";
const MENU_ID_QUIT: &str = "quit";

/// Command behind a transport menu item id
pub fn command_for_menu_id(id: &str) -> Option<PlayerCommand> {
    id.parse().ok()
}

/// Attach the play/pause, skip forward and skip back menu on the dock platform.
///
/// Tauri has no dock menu hook, so the menu hangs off the status bar icon,
/// which is the closest always-present shell surface.
pub fn install<R: Runtime>(app: &AppHandle<R>, capabilities: PlatformCapabilities) -> AppResult<()> {
    if !capabilities.dock_menu {
        return Ok(());
    }

    let transport = PlayerCommand::ALL
        .iter()
        .map(|command| MenuItem::with_id(app, command.message(), command.label(), true, None::<&str>))
        .collect::<Result<Vec<_>, _>>()?;
    let show_i = MenuItem::with_id(app, MENU_ID_SHOW, "Show Pocket Casts", true, None::<&str>)?;
    let quit_i = MenuItem::with_id(app, MENU_ID_QUIT, "Quit", true, None::<&str>)?;

    let mut builder = MenuBuilder::new(app);
    for item in &transport {
        builder = builder.item(item);
    }
    let menu = builder.separator().item(&show_i).item(&quit_i).build()?;

    let icon = Image::from_bytes(include_bytes!("../../icons/tray.png"))?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .icon_as_template(true)
        .tooltip("Pocket Casts")
        .menu(&menu)
        .on_menu_event(|app, event| handle_menu_event(app, event.id.as_ref()))
        .build(app)?;

    log::info!("[MENU] Transport menu installed");
    Ok(())
}

fn handle_menu_event<R: Runtime>(app: &AppHandle<R>, id: &str) {
    if let Some(command) = command_for_menu_id(id) {
        crate::dispatch_command(app, command);
        return;
    }

    match id {
        MENU_ID_SHOW => {
            if let Some(window) = crate::window_manager::get_main_window(app) {
                if let Err(e) = crate::window_manager::surface(&window) {
                    log::warn!("[MENU] Failed to show main window: {}", e);
                }
            }
        }
        MENU_ID_QUIT => app.exit(0),
        other => log::debug!("[MENU] Unhandled menu item: {}", other),
    }
}
