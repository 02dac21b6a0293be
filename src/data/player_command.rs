/// Playback commands that the touch layer can issue
use serde::{Serialize, Deserialize};
use strum_macros::EnumString;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerCommand {
    /// Start playback, or resume it when paused
    Play,
    Pause,
    Stop,
    Next,
    Previous,
}

impl std::fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerCommand::Play => write!(f, "play"),
            PlayerCommand::Pause => write!(f, "pause"),
            PlayerCommand::Stop => write!(f, "stop"),
            PlayerCommand::Next => write!(f, "next"),
            PlayerCommand::Previous => write!(f, "previous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_command_strings() {
        assert_eq!(PlayerCommand::from_str("previous").unwrap(), PlayerCommand::Previous);
        assert_eq!(PlayerCommand::Next.to_string(), "next");
        assert_eq!(serde_json::to_string(&PlayerCommand::Pause).unwrap(), "\"pause\"");
        assert!(PlayerCommand::from_str("seek").is_err());
    }
}
