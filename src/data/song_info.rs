/// Raw descriptor of the daemon's current resource
use serde::{Serialize, Deserialize};

/// The current-song payload as reported by the daemon.
///
/// Equality over the whole descriptor is what identifies a track change,
/// so no field is ever normalised here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    /// Resource path relative to the music directory, or a stream URL
    pub file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Station name for streams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Track length in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<(String, String)>,
}

impl SongInfo {
    /// Create a descriptor for a resource with no metadata
    pub fn with_file(file: &str) -> Self {
        Self {
            file: file.to_string(),
            ..Default::default()
        }
    }

    /// Look up a tag by name, ignoring case
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn album(&self) -> Option<&str> {
        self.tag("Album")
    }

    /// Station name, falling back to the `Name` tag
    pub fn station_name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| self.tag("Name"))
    }

    /// Streams are identified by a URL scheme in the resource path
    pub fn is_stream(&self) -> bool {
        self.file.starts_with("http://")
            || self.file.starts_with("https://")
            || self.file.contains("://")
    }
}

impl From<mpd::Song> for SongInfo {
    fn from(song: mpd::Song) -> Self {
        SongInfo {
            file: song.file,
            title: song.title,
            artist: song.artist,
            name: song.name,
            duration: song.duration.map(|d| d.as_secs_f64()),
            tags: song.tags,
        }
    }
}
