use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_updater::UpdaterExt;

use crate::error::AppResult;
use crate::platform::PlatformCapabilities;
use crate::state::AppContext;

/// Whether this process should look for updates at all
pub fn should_check_for_updates(capabilities: PlatformCapabilities, release_build: bool) -> bool {
    release_build && !capabilities.self_managed_updates
}

/// Fire-and-forget update check, at most once per process.
///
/// Every outcome is only logged. Nothing is shown to the user and startup
/// never waits on it.
pub fn spawn_update_check<R: Runtime>(app: &AppHandle<R>) {
    let ctx = app.state::<AppContext>();

    if !should_check_for_updates(ctx.capabilities, !cfg!(debug_assertions)) {
        log::debug!("[UPDATE] Update check skipped for this build/platform");
        return;
    }

    if !ctx.claim_update_check() {
        return;
    }

    let app_handle = app.clone();
    tauri::async_runtime::spawn(async move {
        match check(&app_handle).await {
            Ok(Some(version)) => log::info!("[UPDATE] Update available: {}", version),
            Ok(None) => log::info!("[UPDATE] Already up to date"),
            Err(e) => log::warn!("[UPDATE] Update check failed: {}", e),
        }
    });
}

async fn check<R: Runtime>(app: &AppHandle<R>) -> AppResult<Option<String>> {
    let update = app.updater()?.check().await?;
    Ok(update.map(|u| u.version))
}
