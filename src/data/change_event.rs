/// Discrete changes detected while reconciling daemon state
use serde::{Serialize, Deserialize};
use strum_macros::EnumString;

/// Change events surfaced to the render layer.
///
/// Events carry no payload; consumers read the current `NowPlaying`
/// and `PlaybackState` from the reconciler after draining an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChangeEvent {
    /// The active resource changed (including to or from nothing)
    TrackChanged,
    /// The album of the new resource differs from the previous one
    AlbumChanged,
    /// Elapsed time of the active resource moved
    TimeElapsed,
    /// Playing / paused / stopped transition
    PlaybackStateChanged,
}

impl std::fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeEvent::TrackChanged => write!(f, "track_changed"),
            ChangeEvent::AlbumChanged => write!(f, "album_changed"),
            ChangeEvent::TimeElapsed => write!(f, "time_elapsed"),
            ChangeEvent::PlaybackStateChanged => write!(f, "playback_state_changed"),
        }
    }
}
