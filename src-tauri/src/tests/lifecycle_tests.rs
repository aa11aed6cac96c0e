//! Window lifecycle scenarios: placement persistence, close semantics,
//! surfacing a running instance, and the playback flag driving the toolbar.

use std::sync::atomic::Ordering;

use serde_json::json;

use super::{FakeWindow, MemoryStore};
use crate::commands::page::{apply_notification, NotificationOutcome};
use crate::platform::{Platform, PlatformCapabilities};
use crate::player::{thumb_buttons, PlaybackState, ThumbIcon};
use crate::settings::{self, Settings, SettingsStore, WindowPlacement};
use crate::window_manager::{
    initial_geometry, on_close_requested, on_second_instance, reveal, surface, CloseAction,
    InitialGeometry, MainWindow, PLAYER_URL,
};

fn default_bounds() -> WindowPlacement {
    WindowPlacement {
        x: 0,
        y: 0,
        width: settings::DEFAULT_WIDTH,
        height: settings::DEFAULT_HEIGHT,
    }
}

/// Window as `create_main_window` would open it, centered windows at the origin
fn open_window(geometry: InitialGeometry) -> FakeWindow {
    let (x, y) = geometry.position.unwrap_or((0, 0));
    FakeWindow::new(WindowPlacement {
        x,
        y,
        width: geometry.width,
        height: geometry.height,
    })
}

#[test]
fn test_missing_record_opens_default_centered_window() {
    let store = MemoryStore::default();

    let geometry = initial_geometry(&Settings::load(&store));

    assert_eq!(
        geometry,
        InitialGeometry {
            width: 800,
            height: 600,
            position: None,
        }
    );
}

#[test]
fn test_saved_record_restores_size_and_position() {
    let store = MemoryStore::default();
    let saved = WindowPlacement {
        x: 220,
        y: 90,
        width: 1024,
        height: 700,
    };
    settings::save_window_state(&store, Some(saved), false).unwrap();

    let geometry = initial_geometry(&Settings::load(&store));

    assert_eq!(
        geometry,
        InitialGeometry {
            width: 1024,
            height: 700,
            position: Some((220, 90)),
        }
    );
}

#[test]
fn test_malformed_record_falls_back_to_defaults() {
    let expected = InitialGeometry {
        width: settings::DEFAULT_WIDTH,
        height: settings::DEFAULT_HEIGHT,
        position: None,
    };

    for malformed in [
        json!({ "x": "left", "y": 0, "width": 900, "height": 500 }),
        json!({ "x": 10, "y": 10, "width": 0, "height": 500 }),
        json!("800x600"),
    ] {
        let store = MemoryStore::default();
        store.set_value("lastWindowState", malformed.clone());

        let geometry = initial_geometry(&Settings::load(&store));
        assert_eq!(geometry, expected, "record {} should be ignored", malformed);
    }
}

#[test]
fn test_first_run_then_close_saves_final_bounds() {
    let store = MemoryStore::default();
    let windows = PlatformCapabilities::for_platform(Platform::Windows);

    // startup without a record falls back to defaults
    let loaded = Settings::load(&store);
    let window = open_window(initial_geometry(&loaded));
    assert_eq!(window.current_placement().unwrap(), default_bounds());

    // user moves and resizes
    let moved = WindowPlacement {
        x: 140,
        y: 75,
        width: 1100,
        height: 720,
    };
    window.move_to(moved);

    let action = on_close_requested(&window, &store, windows, loaded.always_on_top);
    assert_eq!(action, CloseAction::Close);
    assert_eq!(Settings::load(&store).last_window_state, Some(moved));
}

#[test]
fn test_resident_platform_hides_but_still_saves() {
    let store = MemoryStore::default();
    let mac = PlatformCapabilities::for_platform(Platform::MacOs);
    let window = FakeWindow::new(WindowPlacement {
        x: 10,
        y: 20,
        width: 500,
        height: 400,
    });

    let action = on_close_requested(&window, &store, mac, true);

    assert_eq!(action, CloseAction::Hide);
    let saved = Settings::load(&store);
    assert_eq!(saved.last_window_state, Some(window.current_placement().unwrap()));
    assert!(saved.always_on_top);
}

#[test]
fn test_maximized_or_fullscreen_close_keeps_previous_record() {
    let store = MemoryStore::default();
    let linux = PlatformCapabilities::for_platform(Platform::Linux);
    let previous = WindowPlacement {
        x: 5,
        y: 5,
        width: 640,
        height: 480,
    };
    settings::save_window_state(&store, Some(previous), false).unwrap();

    let window = FakeWindow::new(WindowPlacement {
        x: 0,
        y: 0,
        width: 2560,
        height: 1440,
    });
    window.maximized.store(true, Ordering::SeqCst);
    on_close_requested(&window, &store, linux, false);
    assert_eq!(Settings::load(&store).last_window_state, Some(previous));

    window.maximized.store(false, Ordering::SeqCst);
    window.fullscreen.store(true, Ordering::SeqCst);
    on_close_requested(&window, &store, linux, false);
    assert_eq!(Settings::load(&store).last_window_state, Some(previous));
}

#[test]
fn test_minimized_close_keeps_previous_record() {
    let store = MemoryStore::default();
    let windows = PlatformCapabilities::for_platform(Platform::Windows);
    let window = FakeWindow::new(WindowPlacement {
        x: -32000,
        y: -32000,
        width: 160,
        height: 28,
    });
    window.minimized.store(true, Ordering::SeqCst);

    on_close_requested(&window, &store, windows, false);

    assert_eq!(Settings::load(&store).last_window_state, None);
    assert_eq!(store.save_count(), 1, "Preference is still written");
}

#[test]
fn test_second_launch_surfaces_minimized_window() {
    let window = FakeWindow::new(default_bounds());
    window.minimized.store(true, Ordering::SeqCst);

    surface(&window).unwrap();

    assert_eq!(window.calls(), vec!["unminimize", "show_and_focus"]);
    assert!(!window.minimized.load(Ordering::SeqCst));
    assert!(window.visible.load(Ordering::SeqCst));
}

#[test]
fn test_second_launch_focuses_visible_window() {
    let window = FakeWindow::new(default_bounds());
    window.visible.store(true, Ordering::SeqCst);

    surface(&window).unwrap();

    assert_eq!(window.calls(), vec!["show_and_focus"]);
}

#[test]
fn test_second_instance_surfaces_running_window() {
    let window = FakeWindow::new(default_bounds());
    window.minimized.store(true, Ordering::SeqCst);

    assert!(on_second_instance(Some(&window), &["pocketcasts".to_string()]));
    assert_eq!(window.calls(), vec!["unminimize", "show_and_focus"]);
}

#[test]
fn test_second_instance_before_window_exists() {
    assert!(!on_second_instance(None::<&FakeWindow>, &[]));
}

#[test]
fn test_reveal_respects_minimize_flag() {
    let window = FakeWindow::new(default_bounds());
    reveal(&window, false);
    assert_eq!(window.calls(), vec!["show_and_focus"]);

    let minimized = FakeWindow::new(default_bounds());
    reveal(&minimized, true);
    assert_eq!(minimized.calls(), vec!["show_and_focus", "minimize"]);
    assert!(minimized.minimized.load(Ordering::SeqCst));
}

#[test]
fn test_toolbar_always_shows_complement_of_flag() {
    let playback = PlaybackState::new();
    let sequence = [
        "playPause",
        "skipForward",
        "playPause",
        "playPause",
        "skipBack",
        "relayError",
        "playPause",
    ];

    let mut expected = false;
    for message in sequence {
        let outcome = apply_notification(&playback, message, None);
        if message == "playPause" {
            expected = !expected;
            assert_eq!(outcome, NotificationOutcome::Toggled(expected));
        }
        assert_eq!(playback.is_playing(), expected);

        let buttons = thumb_buttons(playback.is_playing());
        let play = buttons.iter().find(|b| b.icon == ThumbIcon::Play).unwrap();
        let pause = buttons.iter().find(|b| b.icon == ThumbIcon::Pause).unwrap();
        assert_eq!(play.visible, !expected);
        assert_eq!(pause.visible, expected);
    }
}

#[test]
fn test_page_ipc_scope_matches_loaded_origin() {
    let capability: serde_json::Value =
        serde_json::from_str(include_str!("../../capabilities/remote.json")).unwrap();
    let urls: Vec<&str> = capability["remote"]["urls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|url| url.as_str().unwrap())
        .collect();

    assert_eq!(urls, vec!["https://play.pocketcasts.com/*"]);
    assert!(PLAYER_URL.starts_with(urls[0].trim_end_matches('*')));
}
