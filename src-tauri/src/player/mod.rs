//! Playback vocabulary shared by the hotkeys, menus and the page relay.

mod command;
mod playback;

pub use command::PlayerCommand;
pub use playback::{thumb_button_command, thumb_buttons, PlaybackState, ThumbButton, ThumbIcon};
