use tauri::{AppHandle, Manager, RunEvent, Runtime, WebviewWindow, WindowEvent};
use tauri_plugin_global_shortcut::GlobalShortcutExt;
use tauri_plugin_store::StoreExt;

mod cli;
mod commands;
mod downloads;
mod error;
mod hotkeys;
mod menu;
mod platform;
mod player;
mod relay;
mod settings;
mod state;
mod updater;
mod window_manager;

#[cfg(test)]
mod tests;

use cli::LaunchArgs;
use commands::page::{page_notification, relay_probe};
use error::AppError;
use platform::PlatformCapabilities;
use player::PlayerCommand;
use settings::Settings;
use state::AppContext;
use window_manager::{get_main_window, CloseAction, MainWindow};

/// Send a playback command to the player page.
///
/// Hotkeys, the dock menu and the taskbar toolbar all end up here. The command
/// is dropped if the page has not bound its controls yet.
pub(crate) fn dispatch_command<R: Runtime>(app: &AppHandle<R>, command: PlayerCommand) {
    let Some(window) = get_main_window(app) else {
        log::warn!("[RELAY] No main window for {}", command);
        return;
    };
    let Some(ctx) = app.try_state::<AppContext>() else {
        log::warn!("[RELAY] {} before app context was ready", command);
        return;
    };

    relay::send_command(&window, &ctx.relay, command);
}

fn attach_window_events<R: Runtime>(app: &AppHandle<R>, window: &WebviewWindow<R>) {
    let app_handle = app.clone();
    let target = window.clone();

    window.on_window_event(move |event| match event {
        WindowEvent::Focused(true) => {
            hotkeys::register_media_keys(app_handle.global_shortcut());
        }
        WindowEvent::CloseRequested { api, .. } => {
            let ctx = app_handle.state::<AppContext>();
            let action = match app_handle.store(settings::STORE_FILE) {
                Ok(store) => window_manager::on_close_requested(
                    &target,
                    &*store,
                    ctx.capabilities,
                    ctx.always_on_top,
                ),
                Err(e) => {
                    log::error!("[WINDOW] Settings store unavailable on close: {}", e);
                    if ctx.capabilities.quits_on_window_close {
                        CloseAction::Close
                    } else {
                        CloseAction::Hide
                    }
                }
            };

            if action == CloseAction::Hide {
                api.prevent_close();
                if let Err(e) = target.hide_window() {
                    log::warn!("[WINDOW] Failed to hide main window: {}", e);
                }
            }
        }
        _ => {}
    });
}

fn handle_run_event<R: Runtime>(app: &AppHandle<R>, event: RunEvent) {
    match event {
        RunEvent::ExitRequested { .. } => {
            if let Some(window) = get_main_window(app) {
                window_manager::save_main_window_state(app, &window);
            }
        }
        // Dock icon clicked while the window is hidden
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            if let Some(window) = get_main_window(app) {
                if let Err(e) = window_manager::surface(&window) {
                    log::warn!("[WINDOW] Failed to reopen main window: {}", e);
                }
            }
        }
        _ => {}
    }
}

fn log_plugin<R: Runtime>() -> tauri::plugin::TauriPlugin<R> {
    tauri_plugin_log::Builder::new()
        .targets([
            tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::LogDir {
                file_name: Some("pocketcasts".into()),
            }),
            #[cfg(debug_assertions)]
            tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
        ])
        .max_file_size(5_000_000)
        .level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .build()
}

pub fn run() -> Result<(), AppError> {
    let launch = LaunchArgs::from_env();
    let capabilities = PlatformCapabilities::current();

    let app = tauri::Builder::default()
        // Must be registered first so a second launch exits before doing anything else
        .plugin(tauri_plugin_single_instance::init(|app, args, _cwd| {
            window_manager::on_second_instance(get_main_window(app).as_ref(), &args);
        }))
        .plugin(log_plugin())
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(|app, shortcut, event| {
                    hotkeys::handle_global_shortcut(app, shortcut, event.state())
                })
                .build(),
        )
        .setup(move |app| {
            let handle = app.handle().clone();

            let store = handle.store(settings::STORE_FILE)?;
            let settings = Settings::load(&*store);
            log::info!(
                "[STARTUP] Starting with capabilities {:?}, minimized: {}",
                capabilities,
                launch.minimize
            );

            app.manage(AppContext::new(
                capabilities,
                launch.clone(),
                settings.always_on_top,
                settings.relay,
            ));

            let window = window_manager::create_main_window(&handle, &settings)?;
            attach_window_events(&handle, &window);

            hotkeys::register_media_keys(handle.global_shortcut());

            if let Err(e) = menu::dock::install(&handle, capabilities) {
                log::warn!("[MENU] Failed to install transport menu: {}", e);
            }

            updater::spawn_update_check(&handle);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![page_notification, relay_probe])
        .build(tauri::generate_context!())?;

    app.run(|app, event| handle_run_event(app, event));
    Ok(())
}
