use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use tauri::{AppHandle, Manager, Runtime, WebviewWindow};
use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::UI::Shell::{
    DefSubclassProc, ITaskbarList3, SetWindowSubclass, TaskbarList, THBF_ENABLED, THBF_HIDDEN,
    THB_FLAGS, THB_ICON, THB_TOOLTIP, THUMBBUTTON,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateIcon, RegisterWindowMessageW, HICON, WM_COMMAND,
};

use super::progress::{ButtonStep, ToolbarProgress};
use crate::error::{AppError, AppResult};
use crate::player::{thumb_button_command, thumb_buttons, ThumbButton, ThumbIcon};

const THBN_CLICKED: usize = 0x1800;
const SUBCLASS_ID: usize = 0x5043_4153;

// Only touched on the main thread, the mutex is for the static
static PROGRESS: Mutex<ToolbarProgress> = Mutex::new(ToolbarProgress::new());
static PLAYING: AtomicBool = AtomicBool::new(false);
static TASKBAR_BUTTON_CREATED: OnceLock<u32> = OnceLock::new();
static CLICK_SINK: OnceLock<Box<dyn Fn(u32) + Send + Sync>> = OnceLock::new();
// HICONs as raw addresses so they can live in a static; they are never destroyed
static ICONS: OnceLock<[usize; 4]> = OnceLock::new();

fn lock_progress() -> MutexGuard<'static, ToolbarProgress> {
    PROGRESS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Message id the shell broadcasts once a window's taskbar button exists
fn taskbar_button_created_message() -> u32 {
    *TASKBAR_BUTTON_CREATED
        .get_or_init(|| unsafe { RegisterWindowMessageW(w!("TaskbarButtonCreated")) })
}

pub(super) fn install<R: Runtime>(window: &WebviewWindow<R>, playing: bool) {
    let app = window.app_handle().clone();
    let _ = CLICK_SINK.set(Box::new(move |id| on_button_clicked(&app, id)));

    sync(window, playing);
}

pub(super) fn refresh<R: Runtime>(window: &WebviewWindow<R>, playing: bool) {
    sync(window, playing);
}

/// Subclass the window if that has not worked yet, then add or update the
/// buttons. An add that fails before the taskbar button exists is retried
/// from `TaskbarButtonCreated`.
fn sync<R: Runtime>(window: &WebviewWindow<R>, playing: bool) {
    PLAYING.store(playing, Ordering::SeqCst);

    let target = window.clone();
    let scheduled = window.run_on_main_thread(move || {
        let hwnd = match window_handle(&target) {
            Ok(hwnd) => hwnd,
            Err(e) => {
                log::warn!("[TASKBAR] No native window handle: {}", e);
                return;
            }
        };

        if let Err(e) = ensure_subclassed(hwnd) {
            log::warn!("[TASKBAR] Failed to subclass main window: {}", e);
        }
        sync_buttons(hwnd);
    });

    if let Err(e) = scheduled {
        log::warn!("[TASKBAR] Could not schedule toolbar update: {}", e);
    }
}

fn window_handle<R: Runtime>(window: &WebviewWindow<R>) -> AppResult<HWND> {
    Ok(HWND(window.hwnd()?.0 as *mut c_void))
}

fn ensure_subclassed(hwnd: HWND) -> AppResult<()> {
    if !lock_progress().needs_subclass() {
        return Ok(());
    }

    // Registered before subclassing so the proc can recognise it
    taskbar_button_created_message();

    if !unsafe { SetWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID, 0) }.as_bool() {
        return Err(AppError::Window("SetWindowSubclass failed".to_string()));
    }

    lock_progress().mark_subclassed();
    Ok(())
}

fn sync_buttons(hwnd: HWND) {
    let step = lock_progress().button_step();

    match (apply(hwnd, PLAYING.load(Ordering::SeqCst), step), step) {
        (Ok(()), ButtonStep::Add) => {
            lock_progress().mark_buttons_added();
            log::info!("[TASKBAR] Thumbnail toolbar installed");
        }
        (Ok(()), ButtonStep::Update) => {}
        (Err(e), ButtonStep::Add) => {
            log::debug!("[TASKBAR] Taskbar button not ready, waiting for the shell: {}", e)
        }
        (Err(e), ButtonStep::Update) => {
            log::warn!("[TASKBAR] Failed to update thumbnail toolbar: {}", e)
        }
    }
}

fn on_button_clicked<R: Runtime>(app: &AppHandle<R>, id: u32) {
    match thumb_button_command(id) {
        Some(command) => crate::dispatch_command(app, command),
        None => log::debug!("[TASKBAR] Click on unknown toolbar button {}", id),
    }
}

fn apply(hwnd: HWND, playing: bool, step: ButtonStep) -> AppResult<()> {
    let icons = icons()?;
    let buttons: Vec<THUMBBUTTON> = thumb_buttons(playing)
        .iter()
        .map(|button| to_native(button, icons))
        .collect();

    unsafe {
        let taskbar: ITaskbarList3 = CoCreateInstance(&TaskbarList, None, CLSCTX_INPROC_SERVER)
            .map_err(|e| AppError::Window(e.to_string()))?;
        taskbar.HrInit().map_err(|e| AppError::Window(e.to_string()))?;

        match step {
            ButtonStep::Add => taskbar.ThumbBarAddButtons(hwnd, &buttons),
            ButtonStep::Update => taskbar.ThumbBarUpdateButtons(hwnd, &buttons),
        }
        .map_err(|e| AppError::Window(e.to_string()))?;
    }

    Ok(())
}

fn to_native(button: &ThumbButton, icons: [usize; 4]) -> THUMBBUTTON {
    let mut tip = [0u16; 260];
    for (slot, unit) in tip.iter_mut().zip(button.tooltip.encode_utf16()) {
        *slot = unit;
    }

    let icon_index = match button.icon {
        ThumbIcon::StepBackward => 0,
        ThumbIcon::Play => 1,
        ThumbIcon::Pause => 2,
        ThumbIcon::StepForward => 3,
    };

    THUMBBUTTON {
        dwMask: THB_ICON | THB_TOOLTIP | THB_FLAGS,
        iId: button.id,
        iBitmap: 0,
        hIcon: HICON(icons[icon_index] as *mut c_void),
        szTip: tip,
        dwFlags: if button.visible { THBF_ENABLED } else { THBF_HIDDEN },
    }
}

fn icons() -> AppResult<[usize; 4]> {
    if let Some(icons) = ICONS.get() {
        return Ok(*icons);
    }

    let loaded = [
        load_icon(include_bytes!("../../../icons/thumbar/step-backward.png"))?,
        load_icon(include_bytes!("../../../icons/thumbar/play.png"))?,
        load_icon(include_bytes!("../../../icons/thumbar/pause.png"))?,
        load_icon(include_bytes!("../../../icons/thumbar/step-forward.png"))?,
    ];
    Ok(*ICONS.get_or_init(|| loaded))
}

fn load_icon(bytes: &[u8]) -> AppResult<usize> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| AppError::Window(format!("Failed to decode toolbar icon: {}", e)))?
        .into_rgba8();
    let (width, height) = image.dimensions();

    // CreateIcon wants BGRA color bits plus a word-aligned 1bpp AND mask
    let mut bgra = image.into_raw();
    for pixel in bgra.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    let mask_stride = width.div_ceil(16) * 2;
    let mask = vec![0u8; (mask_stride * height) as usize];

    let icon = unsafe {
        CreateIcon(
            None,
            width as i32,
            height as i32,
            1,
            32,
            mask.as_ptr(),
            bgra.as_ptr(),
        )
    }
    .map_err(|e| AppError::Window(format!("CreateIcon failed: {}", e)))?;

    Ok(icon.0 as usize)
}

unsafe extern "system" fn subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id: usize,
    _data: usize,
) -> LRESULT {
    if TASKBAR_BUTTON_CREATED.get() == Some(&msg) {
        log::debug!("[TASKBAR] Taskbar button created");
        lock_progress().taskbar_button_created();
        sync_buttons(hwnd);
    } else if msg == WM_COMMAND && (wparam.0 >> 16) & 0xffff == THBN_CLICKED {
        let button_id = (wparam.0 & 0xffff) as u32;
        if let Some(sink) = CLICK_SINK.get() {
            sink(button_id);
        }
        return LRESULT(0);
    }

    unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) }
}
