// MPD status polling and playback control

pub mod error;
pub mod reconciler;
pub mod transport;

pub use error::{CommandError, ConnectionError, PollError};
pub use reconciler::{ReconcilerConfig, StatusReconciler, DEFAULT_POLL_INTERVAL};
pub use transport::{MpdConnector, MpdSession, MpdTransport, TcpConnector, TransportError};
