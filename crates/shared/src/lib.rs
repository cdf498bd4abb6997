//! Wire-level types shared between the chess client and its remote peer.
//!
//! - `piece` - piece kinds, colors and the integer codec used on the wire
//! - `protocol` - board snapshots, squares and request/response messages

pub mod piece;
pub mod protocol;

pub use piece::{Piece, PieceColor, PieceKind};
pub use protocol::{BoardSnapshot, Square};
