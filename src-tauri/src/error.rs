use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("tauri error: {0}")]
    Tauri(#[from] tauri::Error),
    #[error("settings store error: {0}")]
    Store(String),
    #[error("global shortcut error: {0}")]
    Shortcut(String),
    #[error("update check failed: {0}")]
    Updater(String),
    #[error("window error: {0}")]
    Window(String),
}

impl From<tauri_plugin_store::Error> for AppError {
    fn from(err: tauri_plugin_store::Error) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<tauri_plugin_global_shortcut::Error> for AppError {
    fn from(err: tauri_plugin_global_shortcut::Error) -> Self {
        AppError::Shortcut(err.to_string())
    }
}

impl From<tauri_plugin_updater::Error> for AppError {
    fn from(err: tauri_plugin_updater::Error) -> Self {
        AppError::Updater(err.to_string())
    }
}

// Tauri commands surface errors to the page as plain strings
impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

pub type AppResult<T> = Result<T, AppError>;
