// Data structures shared between the reconciler and the render layer

pub mod change_event;
pub mod now_playing;
pub mod playback_state;
pub mod player_command;
pub mod song_info;
pub mod status_snapshot;

// Re-export types from child modules
pub use change_event::*;
pub use now_playing::*;
pub use playback_state::*;
pub use player_command::*;
pub use song_info::*;
pub use status_snapshot::*;
