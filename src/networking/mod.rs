//! Networking: everything between the local game model and the remote peer
//!
//! - `client` - [`RemotePeer`] seam and the HTTP transport
//! - `session` - ids of one joined game, stamped onto every request
//! - `poller` - periodic state requests and how their replies are folded in
//! - `game_client` - the single-writer event loop tying it all together
//! - `error` - transport and protocol failures

pub mod client;
pub mod error;
pub mod game_client;
pub mod poller;
pub mod session;

pub use client::{HttpPeer, RemotePeer};
pub use error::{NetworkError, NetworkResult};
pub use game_client::{ClientCommand, GameClient, LoopEvent};
pub use session::{JoinStatus, Session};
