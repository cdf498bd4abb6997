//! Error types for game module
//!
//! Covers local-consistency failures: squares off the grid, moves from empty
//! squares, and snapshots whose cells do not decode. None of these are
//! retried; the operation that hit them is abandoned.

use shared::piece::CodecError;

/// Errors that can occur in local board logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Coordinate outside `[0, 8)` on either axis
    #[error("Out of bounds access: x: {x} y: {y}")]
    OutOfBounds { x: u8, y: u8 },

    /// Move attempted from a square with no piece on it
    #[error("Piece not found at position ({x}, {y})")]
    PieceNotFound { x: u8, y: u8 },

    /// Square notation that names no square on the board
    #[error("Invalid square: {notation}")]
    InvalidSquare { notation: String },

    /// Snapshot cell that is not a valid piece value
    #[error("Invalid snapshot cell: {0}")]
    Codec(#[from] CodecError),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
