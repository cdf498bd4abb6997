//! Error types for networking module
//!
//! Everything that can go wrong between sending a request and holding a
//! decoded [`shared::protocol::Response`]. These are logged and absorbed by
//! the event loop; none of them end a session.

use crate::game::error::GameError;
use shared::protocol::ProtocolError;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Connection, timeout, or body read failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Peer answered with a non-success status
    #[error("Peer answered with HTTP status {status}")]
    Status { status: u16 },

    /// Body was not valid JSON or not a known message
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Snapshot cells that do not decode into pieces
    #[error("Rejected snapshot: {0}")]
    Snapshot(#[from] GameError),

    /// Join answered with something other than a seat assignment
    #[error("Join rejected: {message}")]
    JoinRejected { message: String },
}

/// Result type alias for networking operations
pub type NetworkResult<T> = Result<T, NetworkError>;
