use std::collections::vec_deque::Drain;
use std::collections::VecDeque;
use std::time::Duration;
use log::{debug, info, trace, warn};

use super::error::{CommandError, ConnectionError, PollError};
use super::transport::{MpdConnector, MpdTransport, TcpConnector, TransportError};
use crate::data::{ChangeEvent, NowPlaying, PlaybackState, PlayerCommand, SongInfo, StatusSnapshot};
use crate::helpers::clock::{Clock, SystemClock};
use crate::helpers::retry::{RetryHandler, RetryPolicy};

/// Default minimum time between two status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Settings for a reconciler instance
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerConfig {
    /// Minimum time between two polls that reach the daemon
    pub poll_interval: Duration,

    /// Backoff used for ping, current song and status requests
    pub retry: RetryPolicy,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        ReconcilerConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry: RetryPolicy::default(),
        }
    }
}

enum Session {
    Disconnected,
    Connected(Box<dyn MpdTransport>),
    /// Terminal, entered through `disconnect`
    Closed,
}

/// Bookkeeping of what the last successful poll saw
struct PollCursor {
    last_poll: Option<Duration>,
    min_interval: Duration,
    /// Raw payload, every field takes part in the equality check
    last_status: Option<mpd::Status>,
    last_resource: Option<SongInfo>,
    /// `None` until the first status payload arrived
    state: Option<PlaybackState>,
}

impl PollCursor {
    fn new(min_interval: Duration) -> Self {
        PollCursor {
            last_poll: None,
            min_interval,
            last_status: None,
            last_resource: None,
            state: None,
        }
    }

    fn is_throttled(&self, now: Duration) -> bool {
        match self.last_poll {
            Some(last) => now.saturating_sub(last) < self.min_interval,
            None => false,
        }
    }
}

/// Keeps a local view of the daemon's playback state and turns the
/// differences between consecutive polls into `ChangeEvent`s.
///
/// The reconciler is meant to be owned by the render loop. All mutating
/// calls take `&mut self`, sharing across threads needs an external lock.
pub struct StatusReconciler {
    connector: Box<dyn MpdConnector>,
    clock: Box<dyn Clock>,
    session: Session,
    address: Option<String>,
    retry: RetryPolicy,
    cursor: PollCursor,
    now_playing: NowPlaying,
    events: VecDeque<ChangeEvent>,
}

impl StatusReconciler {
    pub fn new(connector: Box<dyn MpdConnector>, clock: Box<dyn Clock>, config: ReconcilerConfig) -> Self {
        debug!("Creating StatusReconciler with poll interval {:?}", config.poll_interval);
        StatusReconciler {
            connector,
            clock,
            session: Session::Disconnected,
            address: None,
            retry: config.retry,
            cursor: PollCursor::new(config.poll_interval),
            now_playing: NowPlaying::default(),
            events: VecDeque::new(),
        }
    }

    /// Reconciler talking MPD over TCP, throttled on the system clock
    pub fn with_tcp(config: ReconcilerConfig) -> Self {
        Self::new(Box::new(TcpConnector), Box::new(SystemClock::new()), config)
    }

    /// Open the session and capture the current resource as baseline.
    ///
    /// The baseline does not queue any events.
    pub fn connect(&mut self, hostname: &str, port: u16) -> Result<(), ConnectionError> {
        match self.session {
            Session::Connected(_) => return Err(ConnectionError::AlreadyConnected),
            Session::Closed => return Err(ConnectionError::SessionClosed),
            Session::Disconnected => {}
        }

        let address = format!("{}:{}", hostname, port);
        let transport_error = |source: TransportError| ConnectionError::Transport {
            address: address.clone(),
            source,
        };

        let mut transport = self.connector.connect(hostname, port).map_err(transport_error)?;
        let song = transport.current_song().map_err(transport_error)?;

        self.now_playing = NowPlaying::from_song(song.as_ref());
        self.cursor.last_resource = song;
        info!("Connected to MPD at {}, now playing: {}", address, self.now_playing);

        self.session = Session::Connected(transport);
        self.address = Some(address);
        Ok(())
    }

    /// Close the session. The reconciler cannot be reconnected afterwards.
    pub fn disconnect(&mut self) {
        if let Session::Connected(mut transport) = std::mem::replace(&mut self.session, Session::Closed) {
            match transport.close() {
                Ok(()) => info!("Disconnected from MPD"),
                Err(e) => warn!("Error while closing MPD session: {}", e),
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.session, Session::Connected(_))
    }

    /// `host:port` of the current session
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Poll the daemon and queue events for whatever changed.
    ///
    /// Returns `Ok(false)` without any I/O when the previous successful
    /// poll is less than the poll interval ago. Otherwise returns whether
    /// the status payload differed from the previous one.
    pub fn poll(&mut self) -> Result<bool, PollError> {
        if !self.is_connected() {
            return Err(PollError::NotConnected);
        }

        let now = self.clock.now();
        if self.cursor.is_throttled(now) {
            trace!("Status poll throttled");
            return Ok(false);
        }

        let (song, status) = self.fetch()?;
        self.cursor.last_poll = Some(now);
        Ok(self.apply(song, status))
    }

    /// Run the three retrieval calls. Nothing cached is touched here so a
    /// failure leaves the previous view intact.
    fn fetch(&mut self) -> Result<(Option<SongInfo>, mpd::Status), PollError> {
        let transport = match &mut self.session {
            Session::Connected(transport) => transport,
            _ => return Err(PollError::NotConnected),
        };
        let clock = &*self.clock;
        let policy = &self.retry;

        with_retry(policy, clock, "ping", || transport.ping())?;
        let song = with_retry(policy, clock, "currentsong", || transport.current_song())?;
        let status = with_retry(policy, clock, "status", || transport.status())?;
        Ok((song, status))
    }

    fn apply(&mut self, song: Option<SongInfo>, status: mpd::Status) -> bool {
        let snapshot = StatusSnapshot::from(&status);

        let track_changed = song != self.cursor.last_resource;
        if track_changed {
            let next = NowPlaying::from_song(song.as_ref());
            self.events.push_back(ChangeEvent::TrackChanged);
            if self.now_playing.is_empty() || self.now_playing.album != next.album {
                self.events.push_back(ChangeEvent::AlbumChanged);
            }
            info!("Now playing: {}", next);
            self.now_playing = next;
            self.cursor.last_resource = song;
        }

        if self.cursor.last_status.as_ref() == Some(&status) {
            // the fresh record still has to show where the daemon is
            if track_changed {
                self.now_playing.set_elapsed(snapshot.display_elapsed());
            }
            return false;
        }
        self.cursor.last_status = Some(status);

        let state = snapshot.state;

        if self.cursor.state != Some(state) {
            debug!("Playback state changed: {:?} -> {}", self.cursor.state, state);
            self.cursor.state = Some(state);
            self.events.push_back(ChangeEvent::PlaybackStateChanged);
        }

        if self.now_playing.set_elapsed(snapshot.display_elapsed()) {
            trace!("Elapsed {} / {}", self.now_playing.elapsed_display(), self.now_playing.total_display());
            self.events.push_back(ChangeEvent::TimeElapsed);
        }

        true
    }

    /// Poll (subject to throttling) and return the playback state.
    ///
    /// Poll failures are logged and the cached state is returned. Use
    /// `playback_state` to read the cache without any I/O.
    pub fn get_playback_state(&mut self) -> PlaybackState {
        if let Err(e) = self.poll() {
            warn!("Status poll failed, using cached playback state: {}", e);
        }
        self.playback_state()
    }

    /// Last known playback state, `Stopped` before the first status poll
    pub fn playback_state(&self) -> PlaybackState {
        self.cursor.state.unwrap_or_default()
    }

    /// Issue a playback command. Cached state is left alone, the next
    /// poll picks up whatever the daemon did.
    pub fn send_command(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        let cached = self.playback_state();
        let transport = match &mut self.session {
            Session::Connected(transport) => transport,
            _ => return Err(CommandError::NotConnected),
        };

        info!("Sending command to MPD: {}", command);
        let result = match command {
            PlayerCommand::Play => {
                if cached == PlaybackState::Paused {
                    transport.pause(false)
                } else {
                    transport.play()
                }
            },
            PlayerCommand::Pause => transport.pause(true),
            PlayerCommand::Stop => transport.stop(),
            PlayerCommand::Next => transport.next(),
            PlayerCommand::Previous => transport.prev(),
        };

        result.map_err(|source| {
            warn!("MPD command {} failed: {}", command, source);
            CommandError::Transport { command, source }
        })
    }

    /// Remove and return the oldest queued event
    pub fn pop_event(&mut self) -> Option<ChangeEvent> {
        self.events.pop_front()
    }

    /// Remove all queued events, oldest first
    pub fn drain_events(&mut self) -> Drain<'_, ChangeEvent> {
        self.events.drain(..)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    /// True while a radio stream is the active resource
    pub fn is_radio(&self) -> bool {
        self.now_playing.is_radio()
    }

    pub fn poll_interval(&self) -> Duration {
        self.cursor.min_interval
    }
}

fn with_retry<T, F>(policy: &RetryPolicy, clock: &dyn Clock, operation: &'static str, call: F) -> Result<T, PollError>
where
    F: FnMut() -> Result<T, TransportError>,
{
    RetryHandler::from_policy(policy)
        .execute_with_retry(call, clock, operation)
        .map_err(|exhausted| PollError::from_exhausted(operation, exhausted))
}
