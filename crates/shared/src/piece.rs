//! Piece codec
//!
//! A piece travels over the wire (and sits in board snapshots) as one small
//! integer: the kind in the low three bits, the owning color in bit 3.
//!
//! ```text
//! value = kind | (color << 3)
//! kind  = value & 0b111
//! color = (value >> 3) & 0b1
//! ```
//!
//! Kind `0` means "no piece". It has no `PieceKind` variant, so a board cell
//! can never hold an empty-kind piece; absence is `Option::None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire value of an empty square.
pub const EMPTY: i32 = 0;

const KIND_MASK: i32 = 0b111;
const COLOR_SHIFT: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid piece value on the wire: {value}")]
    InvalidPieceValue { value: i32 },

    #[error("Invalid color value on the wire: {value}")]
    InvalidColor { value: i32 },
}

/// Side owning a piece, or whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum PieceColor {
    #[default]
    White = 0,
    Black = 1,
}

impl PieceColor {
    pub fn opponent(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "White",
            PieceColor::Black => "Black",
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for PieceColor {
    type Error = CodecError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PieceColor::White),
            1 => Ok(PieceColor::Black),
            _ => Err(CodecError::InvalidColor { value }),
        }
    }
}

impl From<PieceColor> for i32 {
    fn from(color: PieceColor) -> Self {
        color as i32
    }
}

/// Kind of an occupying piece. Discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    fn from_bits(bits: i32) -> Option<Self> {
        match bits {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Single-letter symbol, uppercase; callers lowercase it for black.
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

/// An occupying piece. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: PieceColor) -> Self {
        Self { kind, color }
    }

    pub fn encode(self) -> i32 {
        encode(self.kind, self.color)
    }

    /// Board symbol: uppercase for white, lowercase for black.
    pub fn symbol(self) -> char {
        match self.color {
            PieceColor::White => self.kind.symbol(),
            PieceColor::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}

/// Pack a kind and owner into the wire integer.
pub fn encode(kind: PieceKind, color: PieceColor) -> i32 {
    (kind as i32) | ((color as i32) << COLOR_SHIFT)
}

/// Unpack a wire integer.
///
/// Returns `Ok(None)` for an empty square. Anything outside `0..=15`, or a
/// kind of 7, is rejected rather than passed through.
pub fn decode(value: i32) -> Result<Option<Piece>, CodecError> {
    if !(0..=0b1111).contains(&value) {
        return Err(CodecError::InvalidPieceValue { value });
    }

    let bits = value & KIND_MASK;
    if bits == EMPTY {
        return Ok(None);
    }

    let kind = PieceKind::from_bits(bits).ok_or(CodecError::InvalidPieceValue { value })?;
    let color = if (value >> COLOR_SHIFT) & 0b1 == 0 {
        PieceColor::White
    } else {
        PieceColor::Black
    };

    Ok(Some(Piece::new(kind, color)))
}

/// Encode an optional cell, `None` becoming [`EMPTY`].
pub fn encode_cell(cell: Option<Piece>) -> i32 {
    cell.map_or(EMPTY, Piece::encode)
}
