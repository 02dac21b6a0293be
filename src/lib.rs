/// Now-playing data shared with the render layer
pub mod data;

/// Player backends and the MPD status reconciler
pub mod players;

/// Helper utilities (retry, clock, formatting)
pub mod helpers;

/// Configuration file handling
pub mod config;

/// Logging setup
pub mod logging;

pub use data::{ChangeEvent, NowPlaying, PlaybackState, PlayerCommand};
pub use players::{StatusReconciler, ReconcilerConfig};
