/// Now-playing record shown on the player screen
use std::fmt;
use serde::{Serialize, Deserialize};
use strum_macros::EnumString;

use super::SongInfo;
use crate::helpers::time_format::format_clock;

/// Placeholder for metadata missing from a file resource
pub const UNKNOWN: &str = "Unknown";

/// What kind of resource is active
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    File,
    Radio,
    None,
}

impl Default for MediaKind {
    fn default() -> Self {
        MediaKind::None
    }
}

/// Snapshot of the currently active media item.
///
/// A new record is built for every track change; only the elapsed time
/// is updated in place while the same resource stays active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub kind: MediaKind,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub source_path: String,
    elapsed_seconds: f64,
    total_seconds: f64,
    percent_elapsed: u8,
}

impl NowPlaying {
    /// Build the record for a daemon resource, or the empty record when
    /// nothing is queued.
    pub fn from_song(song: Option<&SongInfo>) -> Self {
        let song = match song {
            Some(song) => song,
            None => return NowPlaying::default(),
        };

        let title = song.title.clone().unwrap_or_else(|| UNKNOWN.to_string());

        if song.is_stream() {
            NowPlaying {
                kind: MediaKind::Radio,
                title,
                artist: String::new(),
                album: song.station_name().unwrap_or(UNKNOWN).to_string(),
                source_path: song.file.clone(),
                ..Default::default()
            }
        } else {
            let total = song.duration
                .filter(|d| d.is_finite() && *d > 0.0)
                .unwrap_or(0.0);
            NowPlaying {
                kind: MediaKind::File,
                title,
                artist: song.artist.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                album: song.album().unwrap_or(UNKNOWN).to_string(),
                source_path: song.file.clone(),
                total_seconds: total,
                ..Default::default()
            }
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Track length, 0 for radio streams
    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    /// Progress through the track, always within 0..=100
    pub fn percent_elapsed(&self) -> u8 {
        self.percent_elapsed
    }

    pub fn is_radio(&self) -> bool {
        self.kind == MediaKind::Radio
    }

    pub fn is_empty(&self) -> bool {
        self.kind == MediaKind::None
    }

    /// Elapsed time as `m:ss`
    pub fn elapsed_display(&self) -> String {
        format_clock(self.elapsed_seconds)
    }

    /// Track length as `m:ss`
    pub fn total_display(&self) -> String {
        format_clock(self.total_seconds)
    }

    /// Move the elapsed time, returns true if it changed
    pub fn set_elapsed(&mut self, seconds: f64) -> bool {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if seconds == self.elapsed_seconds {
            return false;
        }
        self.elapsed_seconds = seconds;
        self.percent_elapsed = Self::percentage(seconds, self.total_seconds, self.kind);
        true
    }

    fn percentage(elapsed: f64, total: f64, kind: MediaKind) -> u8 {
        if kind == MediaKind::Radio || total <= 0.0 {
            return 0;
        }
        (elapsed / total * 100.0).floor().clamp(0.0, 100.0) as u8
    }
}

impl fmt::Display for NowPlaying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MediaKind::None => write!(f, "nothing playing"),
            MediaKind::Radio => write!(f, "{} ({})", self.title, self.album),
            MediaKind::File => write!(f, "{} by {} ({})", self.title, self.artist, self.album),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_song(title: Option<&str>, album: Option<&str>, duration: f64) -> SongInfo {
        let mut song = SongInfo::with_file("Jazz/Kind of Blue/01 So What.flac");
        song.title = title.map(str::to_string);
        song.artist = Some("Miles Davis".to_string());
        song.duration = Some(duration);
        if let Some(album) = album {
            song.tags.push(("Album".to_string(), album.to_string()));
        }
        song
    }

    #[test]
    fn test_file_record() {
        let song = file_song(Some("So What"), Some("Kind of Blue"), 120.0);
        let np = NowPlaying::from_song(Some(&song));
        assert_eq!(np.kind, MediaKind::File);
        assert_eq!(np.title, "So What");
        assert_eq!(np.artist, "Miles Davis");
        assert_eq!(np.album, "Kind of Blue");
        assert_eq!(np.total_seconds(), 120.0);
        assert_eq!(np.total_display(), "2:00");
    }

    #[test]
    fn test_file_defaults_to_unknown() {
        let song = SongInfo::with_file("loose/track.mp3");
        let np = NowPlaying::from_song(Some(&song));
        assert_eq!(np.title, UNKNOWN);
        assert_eq!(np.artist, UNKNOWN);
        assert_eq!(np.album, UNKNOWN);
        assert_eq!(np.total_seconds(), 0.0);
    }

    #[test]
    fn test_radio_record() {
        let mut song = SongInfo::with_file("http://radio.example:8000/jazz");
        song.name = Some("Jazz FM".to_string());
        song.artist = Some("ignored".to_string());
        song.duration = Some(300.0);
        let mut np = NowPlaying::from_song(Some(&song));
        assert!(np.is_radio());
        assert_eq!(np.album, "Jazz FM");
        assert_eq!(np.artist, "");
        assert_eq!(np.total_seconds(), 0.0);
        assert!(np.set_elapsed(90.0));
        assert_eq!(np.percent_elapsed(), 0);
    }

    #[test]
    fn test_empty_record() {
        let np = NowPlaying::from_song(None);
        assert!(np.is_empty());
        assert_eq!(np.title, "");
        assert_eq!(np.to_string(), "nothing playing");
    }

    #[test]
    fn test_percentage_floor_and_clamp() {
        let song = file_song(Some("So What"), None, 120.0);
        let mut np = NowPlaying::from_song(Some(&song));
        assert!(np.set_elapsed(30.0));
        assert_eq!(np.percent_elapsed(), 25);
        assert!(np.set_elapsed(59.9));
        assert_eq!(np.percent_elapsed(), 49);
        assert!(np.set_elapsed(130.0));
        assert_eq!(np.percent_elapsed(), 100);
        assert_eq!(np.elapsed_display(), "2:10");
    }

    #[test]
    fn test_unchanged_elapsed_reports_false() {
        let song = file_song(None, None, 200.0);
        let mut np = NowPlaying::from_song(Some(&song));
        assert!(np.set_elapsed(10.0));
        assert!(!np.set_elapsed(10.0));
        assert!(!NowPlaying::default().set_elapsed(0.0));
    }

    #[test]
    fn test_zero_length_file_has_zero_percent() {
        let song = file_song(None, None, 0.0);
        let mut np = NowPlaying::from_song(Some(&song));
        assert!(np.set_elapsed(42.0));
        assert_eq!(np.percent_elapsed(), 0);
    }
}
