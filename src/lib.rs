//! Networked chess client
//!
//! A local board that applies the player's moves immediately and keeps
//! itself in step with an authoritative peer reachable over HTTP.
//!
//! - `game` - board, selection, turn and reconciliation logic (no I/O)
//! - `networking` - transport, session, poller and the client event loop
//! - `rendering` - the view seam and a terminal view
//! - `input` - typed commands for the terminal client
//! - `core` - settings and their persistence

pub mod core;
pub mod game;
pub mod input;
pub mod networking;
pub mod rendering;
