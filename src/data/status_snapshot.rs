/// The parts of the daemon's status payload the diff steps look at
use serde::{Serialize, Deserialize};
use super::PlaybackState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub state: PlaybackState,

    /// Mixer volume, -1 when the daemon has no volume control
    pub volume: i8,

    pub repeat: bool,
    pub random: bool,
    pub single: bool,

    pub queue_len: u32,

    /// Position of the current song in the queue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_position: Option<u32>,

    /// Elapsed time of the current song in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<f64>,
}

impl StatusSnapshot {
    /// Elapsed seconds as displayed, 0 while stopped or when not reported
    pub fn display_elapsed(&self) -> f64 {
        if self.state.is_active() {
            self.elapsed.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

impl From<&mpd::Status> for StatusSnapshot {
    fn from(status: &mpd::Status) -> Self {
        StatusSnapshot {
            state: PlaybackState::from(status.state),
            volume: status.volume,
            repeat: status.repeat,
            random: status.random,
            single: status.single,
            queue_len: status.queue_len,
            song_position: status.song.map(|s| s.pos),
            elapsed: status.elapsed.map(|e| e.as_secs_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_status() {
        let status = mpd::Status {
            state: mpd::State::Pause,
            volume: 80,
            queue_len: 12,
            elapsed: Some(Duration::from_millis(61_500)),
            ..Default::default()
        };

        let snapshot = StatusSnapshot::from(&status);
        assert_eq!(snapshot.state, PlaybackState::Paused);
        assert_eq!(snapshot.volume, 80);
        assert_eq!(snapshot.queue_len, 12);
        assert_eq!(snapshot.song_position, None);
        assert_eq!(snapshot.display_elapsed(), 61.5);
    }

    #[test]
    fn test_stopped_displays_zero() {
        let snapshot = StatusSnapshot {
            state: PlaybackState::Stopped,
            elapsed: Some(12.0),
            ..Default::default()
        };
        assert_eq!(snapshot.display_elapsed(), 0.0);
    }
}
