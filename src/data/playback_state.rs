/// Playback state enumeration as reported by the daemon
use serde::{Serialize, Deserialize};
use strum_macros::EnumString;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Daemon is actively playing the current resource
    #[serde(rename = "playing")]
    #[strum(serialize = "playing", serialize = "play")]
    Playing,
    /// Playback is paused
    #[serde(rename = "paused")]
    #[strum(serialize = "paused", serialize = "pause")]
    Paused,
    /// Playback is stopped
    #[serde(rename = "stopped")]
    #[strum(serialize = "stopped", serialize = "stop")]
    Stopped,
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Stopped
    }
}

impl PlaybackState {
    /// True for every state except `Stopped`
    pub fn is_active(&self) -> bool {
        *self != PlaybackState::Stopped
    }
}

impl From<mpd::State> for PlaybackState {
    fn from(state: mpd::State) -> Self {
        match state {
            mpd::State::Play => PlaybackState::Playing,
            mpd::State::Pause => PlaybackState::Paused,
            mpd::State::Stop => PlaybackState::Stopped,
        }
    }
}

impl From<PlaybackState> for mpd::State {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Playing => mpd::State::Play,
            PlaybackState::Paused => mpd::State::Pause,
            PlaybackState::Stopped => mpd::State::Stop,
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Stopped => write!(f, "stopped"),
        }
    }
}
