/// Player backends for the jukebox
pub mod mpd;

pub use self::mpd::{StatusReconciler, ReconcilerConfig};
