//! Downloads started from the player page are saved to the user's Downloads
//! folder without asking, under a name that does not overwrite anything.

use std::path::{Path, PathBuf};

use tauri::webview::DownloadEvent;
use tauri::{Runtime, Url, Webview};

const FALLBACK_FILE_NAME: &str = "download";

pub fn download_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

/// Name the webview suggested, else the last URL path segment
pub fn file_name_for(suggested: &Path, url: &Url) -> String {
    suggested
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// `dir/file_name`, or `dir/stem (n).ext` with the first `n` not taken yet
pub fn unused_destination(dir: &Path, file_name: &str, exists: impl Fn(&Path) -> bool) -> PathBuf {
    let candidate = dir.join(file_name);
    if !exists(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);
    let extension = name.extension().and_then(|ext| ext.to_str());

    (1..=u32::MAX)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|path| !exists(path))
        .unwrap_or(candidate)
}

/// Download hook for the main window
pub fn handle_download<R: Runtime>(_webview: Webview<R>, event: DownloadEvent<'_>) -> bool {
    match event {
        DownloadEvent::Requested { url, destination } => {
            match download_dir() {
                Some(dir) => {
                    let file_name = file_name_for(destination.as_path(), &url);
                    *destination = unused_destination(&dir, &file_name, Path::exists);
                    log::info!("[DOWNLOAD] Saving {} to {}", url, destination.display());
                }
                None => log::warn!(
                    "[DOWNLOAD] No Downloads folder, keeping default location for {}",
                    url
                ),
            }
            true
        }
        DownloadEvent::Finished { url, path, success } => {
            if success {
                log::info!("[DOWNLOAD] Finished {} -> {:?}", url, path);
            } else {
                log::warn!("[DOWNLOAD] Download of {} failed", url);
            }
            true
        }
        _ => true,
    }
}
