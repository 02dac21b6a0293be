use std::net::TcpStream;
use log::{debug, info, warn};
use mpd::Client;
use thiserror::Error;

use crate::data::SongInfo;

/// Failure of a single request to the daemon
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("MPD error: {0}")]
    Mpd(#[from] mpd::error::Error),

    #[error("connection closed")]
    Closed,

    #[error("{0}")]
    Other(String),
}

/// Request/response session with a playback daemon.
///
/// Every call is a single round trip, retries are the caller's concern.
pub trait MpdTransport: Send {
    /// Liveness check
    fn ping(&mut self) -> Result<(), TransportError>;

    /// The active resource, `None` when the queue has no current song
    fn current_song(&mut self) -> Result<Option<SongInfo>, TransportError>;

    /// The full status payload as the daemon reported it
    fn status(&mut self) -> Result<mpd::Status, TransportError>;

    /// Start playback of the current queue position
    fn play(&mut self) -> Result<(), TransportError>;

    /// Pause (`true`) or resume (`false`) playback
    fn pause(&mut self, paused: bool) -> Result<(), TransportError>;

    fn stop(&mut self) -> Result<(), TransportError>;

    fn next(&mut self) -> Result<(), TransportError>;

    fn prev(&mut self) -> Result<(), TransportError>;

    /// End the session, the transport must not be used afterwards
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Opens transports to a daemon address
pub trait MpdConnector: Send {
    fn connect(&self, hostname: &str, port: u16) -> Result<Box<dyn MpdTransport>, TransportError>;
}

/// Connector for the MPD protocol over TCP
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl MpdConnector for TcpConnector {
    fn connect(&self, hostname: &str, port: u16) -> Result<Box<dyn MpdTransport>, TransportError> {
        let addr = format!("{}:{}", hostname, port);
        debug!("Connecting to MPD at {}", addr);

        match Client::connect(&addr) {
            Ok(client) => {
                info!("Connected to MPD {}.{}.{} at {}",
                    client.version.0, client.version.1, client.version.2, addr);
                Ok(Box::new(MpdSession { client, addr }))
            },
            Err(e) => {
                warn!("Failed to connect to MPD at {}: {}", addr, e);
                Err(e.into())
            }
        }
    }
}

/// An open `mpd::Client` connection
pub struct MpdSession {
    client: Client<TcpStream>,
    addr: String,
}

impl MpdTransport for MpdSession {
    fn ping(&mut self) -> Result<(), TransportError> {
        Ok(self.client.ping()?)
    }

    fn current_song(&mut self) -> Result<Option<SongInfo>, TransportError> {
        Ok(self.client.currentsong()?.map(SongInfo::from))
    }

    fn status(&mut self) -> Result<mpd::Status, TransportError> {
        Ok(self.client.status()?)
    }

    fn play(&mut self) -> Result<(), TransportError> {
        Ok(self.client.play()?)
    }

    fn pause(&mut self, paused: bool) -> Result<(), TransportError> {
        Ok(self.client.pause(paused)?)
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        Ok(self.client.stop()?)
    }

    fn next(&mut self) -> Result<(), TransportError> {
        Ok(self.client.next()?)
    }

    fn prev(&mut self) -> Result<(), TransportError> {
        Ok(self.client.prev()?)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        debug!("Closing MPD session to {}", self.addr);
        Ok(self.client.close()?)
    }
}
