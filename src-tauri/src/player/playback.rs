use std::sync::atomic::{AtomicBool, Ordering};

use super::PlayerCommand;

/// "Is a podcast currently playing", as far as the host can tell.
///
/// Only flipped by play/pause notifications from the page. Starts out false
/// on every launch and is never persisted.
#[derive(Debug, Default)]
pub struct PlaybackState {
    playing: AtomicBool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Flip the flag and return the new value
    pub fn toggle(&self) -> bool {
        let was_playing = self.playing.fetch_xor(true, Ordering::SeqCst);
        let now_playing = !was_playing;
        log::debug!("[PLAYBACK] playing: {} -> {}", was_playing, now_playing);
        now_playing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbIcon {
    StepBackward,
    Play,
    Pause,
    StepForward,
}

/// One button of the taskbar thumbnail toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbButton {
    pub id: u32,
    pub tooltip: &'static str,
    pub icon: ThumbIcon,
    pub command: PlayerCommand,
    pub visible: bool,
}

/// Toolbar layout for the given playback flag: skip back, play, pause, skip forward.
///
/// Exactly one of play/pause is visible. Play shows while nothing is playing.
pub fn thumb_buttons(playing: bool) -> [ThumbButton; 4] {
    [
        ThumbButton {
            id: 0,
            tooltip: "Skip back",
            icon: ThumbIcon::StepBackward,
            command: PlayerCommand::SkipBack,
            visible: true,
        },
        ThumbButton {
            id: 1,
            tooltip: "Play",
            icon: ThumbIcon::Play,
            command: PlayerCommand::PlayPause,
            visible: !playing,
        },
        ThumbButton {
            id: 2,
            tooltip: "Pause",
            icon: ThumbIcon::Pause,
            command: PlayerCommand::PlayPause,
            visible: playing,
        },
        ThumbButton {
            id: 3,
            tooltip: "Skip forward",
            icon: ThumbIcon::StepForward,
            command: PlayerCommand::SkipForward,
            visible: true,
        },
    ]
}

/// Command behind a toolbar button id, if any
pub fn thumb_button_command(id: u32) -> Option<PlayerCommand> {
    thumb_buttons(false)
        .into_iter()
        .find(|button| button.id == id)
        .map(|button| button.command)
}
