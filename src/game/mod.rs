//! Local game model
//!
//! Everything here is synchronous and network-free, so it can be driven from
//! tests directly.
//!
//! # Module Organization
//!
//! - `board` - 8x8 grid with bounds-checked accessors and snapshot decoding
//! - `selection` - two-click gesture machine
//! - `state` - board + turn + gesture + phase, folded from inbound messages
//! - `sync` - optimistic moves and their reconciliation
//! - `error` - local-consistency errors

pub mod board;
pub mod error;
pub mod selection;
pub mod state;
pub mod sync;

pub use board::BoardState;
pub use error::{GameError, GameResult};
pub use selection::{Interaction, MoveAttempt};
pub use state::{ClientState, Effect, GameOutcome, GamePhase};
pub use sync::PendingMove;
