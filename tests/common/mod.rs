// Common helpers for reconciler integration tests

use jukebox::data::{PlaybackState, SongInfo};
use jukebox::helpers::ManualClock;
use jukebox::players::mpd::{MpdConnector, MpdTransport, TransportError};
use jukebox::players::{ReconcilerConfig, StatusReconciler};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// State of the scripted daemon, shared with every transport it hands out
#[derive(Debug, Default)]
pub struct DaemonState {
    pub song: Option<SongInfo>,
    pub status: mpd::Status,
    /// Number of upcoming requests that fail before requests succeed again
    pub failures_remaining: usize,
    pub refuse_connections: bool,
    pub reject_commands: bool,
    /// Requests that reached the daemon (ping, currentsong, status)
    pub requests: usize,
    pub commands: Vec<String>,
    pub closed: bool,
}

/// In-memory daemon standing in for MPD
#[derive(Debug, Clone, Default)]
pub struct FakeDaemon {
    state: Arc<Mutex<DaemonState>>,
}

impl FakeDaemon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, DaemonState> {
        self.state.lock().unwrap()
    }

    pub fn set_song(&self, song: Option<SongInfo>) {
        self.state().song = song;
    }

    pub fn set_playback(&self, state: PlaybackState, elapsed: Option<f64>) {
        let mut daemon = self.state();
        daemon.status.state = mpd::State::from(state);
        daemon.status.elapsed = elapsed.map(Duration::from_secs_f64);
    }

    pub fn requests(&self) -> usize {
        self.state().requests
    }

    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    fn request<T>(&self, answer: impl FnOnce(&DaemonState) -> T) -> Result<T, TransportError> {
        let mut daemon = self.state();
        daemon.requests += 1;
        if daemon.failures_remaining > 0 {
            daemon.failures_remaining -= 1;
            return Err(TransportError::Other("connection reset by peer".to_string()));
        }
        Ok(answer(&daemon))
    }

    fn command(&self, name: &str) -> Result<(), TransportError> {
        let mut daemon = self.state();
        if daemon.reject_commands {
            return Err(TransportError::Other(format!("{} refused", name)));
        }
        daemon.commands.push(name.to_string());
        Ok(())
    }
}

impl MpdConnector for FakeDaemon {
    fn connect(&self, _hostname: &str, _port: u16) -> Result<Box<dyn MpdTransport>, TransportError> {
        if self.state().refuse_connections {
            return Err(TransportError::Other("connection refused".to_string()));
        }
        Ok(Box::new(FakeTransport { daemon: self.clone() }))
    }
}

pub struct FakeTransport {
    daemon: FakeDaemon,
}

impl MpdTransport for FakeTransport {
    fn ping(&mut self) -> Result<(), TransportError> {
        self.daemon.request(|_| ())
    }

    fn current_song(&mut self) -> Result<Option<SongInfo>, TransportError> {
        self.daemon.request(|d| d.song.clone())
    }

    fn status(&mut self) -> Result<mpd::Status, TransportError> {
        self.daemon.request(|d| d.status.clone())
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.daemon.command("play")
    }

    fn pause(&mut self, paused: bool) -> Result<(), TransportError> {
        self.daemon.command(if paused { "pause" } else { "resume" })
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        self.daemon.command("stop")
    }

    fn next(&mut self) -> Result<(), TransportError> {
        self.daemon.command("next")
    }

    fn prev(&mut self) -> Result<(), TransportError> {
        self.daemon.command("previous")
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.daemon.state().closed = true;
        Ok(())
    }
}

/// A file resource with album tag and length
pub fn file_song(file: &str, title: &str, album: &str, duration: f64) -> SongInfo {
    let mut song = SongInfo::with_file(file);
    song.title = Some(title.to_string());
    song.artist = Some("Test Artist".to_string());
    song.duration = Some(duration);
    song.tags.push(("Album".to_string(), album.to_string()));
    song
}

pub fn radio_song(url: &str, station: &str) -> SongInfo {
    let mut song = SongInfo::with_file(url);
    song.name = Some(station.to_string());
    song
}

/// Reconciler wired to the fake daemon and a manual clock, not yet connected
pub fn reconciler(daemon: &FakeDaemon, clock: &ManualClock) -> StatusReconciler {
    StatusReconciler::new(
        Box::new(daemon.clone()),
        Box::new(clock.clone()),
        ReconcilerConfig::default(),
    )
}

/// Connected reconciler that has completed one poll with an empty queue
pub fn primed_reconciler(daemon: &FakeDaemon, clock: &ManualClock) -> StatusReconciler {
    let mut reconciler = reconciler(daemon, clock);
    reconciler.connect("localhost", 6600).unwrap();
    reconciler.poll().unwrap();
    reconciler.drain_events().for_each(drop);
    clock.advance_millis(1000);
    reconciler
}

pub fn drain(reconciler: &mut StatusReconciler) -> Vec<jukebox::data::ChangeEvent> {
    reconciler.drain_events().collect()
}
