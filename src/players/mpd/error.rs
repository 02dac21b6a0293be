use thiserror::Error;

use super::transport::TransportError;
use crate::data::PlayerCommand;
use crate::helpers::retry::RetryExhausted;

/// Opening a session failed
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to connect to MPD at {address}: {source}")]
    Transport {
        address: String,
        #[source]
        source: TransportError,
    },

    #[error("already connected to MPD")]
    AlreadyConnected,

    #[error("session was closed, create a new reconciler to reconnect")]
    SessionClosed,
}

/// A status poll could not be completed
#[derive(Debug, Error)]
pub enum PollError {
    #[error("not connected to MPD")]
    NotConnected,

    #[error("{operation} failed after {attempts} attempts: {source}")]
    Retrieval {
        operation: &'static str,
        attempts: usize,
        #[source]
        source: TransportError,
    },
}

impl PollError {
    pub(crate) fn from_exhausted(operation: &'static str, exhausted: RetryExhausted<TransportError>) -> Self {
        PollError::Retrieval {
            operation,
            attempts: exhausted.attempts,
            source: exhausted.last_error,
        }
    }
}

/// A playback command was not accepted
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("not connected to MPD")]
    NotConnected,

    #[error("MPD rejected {command}: {source}")]
    Transport {
        command: PlayerCommand,
        #[source]
        source: TransportError,
    },
}
