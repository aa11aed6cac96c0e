use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playback action understood by the embedded player.
///
/// The same three names travel in both directions: as commands from the host
/// to the page, and as notifications from the page when the user clicks a
/// control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerCommand {
    PlayPause,
    SkipForward,
    SkipBack,
}

impl PlayerCommand {
    pub const ALL: [PlayerCommand; 3] = [
        PlayerCommand::PlayPause,
        PlayerCommand::SkipForward,
        PlayerCommand::SkipBack,
    ];

    /// Message name used on the wire
    pub fn message(self) -> &'static str {
        match self {
            PlayerCommand::PlayPause => "playPause",
            PlayerCommand::SkipForward => "skipForward",
            PlayerCommand::SkipBack => "skipBack",
        }
    }

    /// CSS selector of the page control this command clicks
    pub fn selector(self) -> &'static str {
        match self {
            PlayerCommand::PlayPause => ".play_pause_button",
            PlayerCommand::SkipForward => ".skip_forward_button",
            PlayerCommand::SkipBack => ".skip_back_button",
        }
    }

    /// Label used in menus
    pub fn label(self) -> &'static str {
        match self {
            PlayerCommand::PlayPause => "Play/pause",
            PlayerCommand::SkipForward => "Skip forward",
            PlayerCommand::SkipBack => "Skip back",
        }
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl FromStr for PlayerCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerCommand::ALL
            .into_iter()
            .find(|command| command.message() == s)
            .ok_or_else(|| format!("Unknown player message: {}", s))
    }
}
