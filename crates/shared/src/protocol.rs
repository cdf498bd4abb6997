//! Request/response protocol spoken with the remote game peer.
//!
//! Every message is one JSON object distinguished by a numeric `messageType`
//! tag. On our side of the boundary the tag becomes an enum variant, so the
//! rest of the client matches exhaustively instead of probing optional
//! fields. The flat wire shapes (`WireRequest`/`WireResponse`) stay private to
//! this module.
//!
//! # Message codes
//!
//! | Outbound        | Code | Inbound               | Code |
//! |-----------------|------|-----------------------|------|
//! | `JoinGame`      | 128  | `WaitForOpponent`     | 0    |
//! | `RequestState`  | 129  | `GameStarted`         | 1    |
//! | `MovePiece`     | 130  | `StateSync`           | 2    |
//! | `Disconnect`    | 131  | `MoveAccepted`        | 3    |
//! |                 |      | `GameEnded`           | 4    |
//! |                 |      | `PlayerDisconnected`  | 5    |
//! |                 |      | `OpponentDisconnected`| 6    |

use crate::piece::PieceColor;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const JOIN_GAME: u16 = 128;
pub const REQUEST_STATE: u16 = 129;
pub const MOVE_PIECE: u16 = 130;
pub const DISCONNECT: u16 = 131;

pub const WAIT_FOR_OPPONENT: u16 = 0;
pub const GAME_STARTED: u16 = 1;
pub const STATE_SYNC: u16 = 2;
pub const MOVE_ACCEPTED: u16 = 3;
pub const GAME_ENDED: u16 = 4;
pub const PLAYER_DISCONNECTED: u16 = 5;
pub const OPPONENT_DISCONNECTED: u16 = 6;

pub const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Unknown message type: {0}")]
    UnknownMessageType(u16),

    #[error("Message type {message_type} is missing field `{field}`")]
    MissingField {
        message_type: u16,
        field: &'static str,
    },
}

/// Board coordinate: `x` is the file (column), `y` the row as sent by the
/// peer, row 0 being Black's back rank. Serialized as `[x, y]`.
///
/// Not bounds-checked on construction; the board rejects squares off the
/// grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub fn is_on_board(self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// Parse algebraic notation such as `e4`.
    ///
    /// Rank 8 maps to row 0, so `e2` is `(4, 6)` and `e4` is `(4, 4)`.
    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.trim().chars();
        let file = chars.next()?.to_ascii_lowercase();
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match (file, rank) {
            ('a'..='h', '1'..='8') => Some(Square::new(
                file as u8 - b'a',
                BOARD_SIZE as u8 - (rank as u8 - b'0'),
            )),
            _ => None,
        }
    }

    pub fn to_algebraic(self) -> Option<String> {
        if !self.is_on_board() {
            return None;
        }
        let file = (b'a' + self.x) as char;
        let rank = BOARD_SIZE as u8 - self.y;
        Some(format!("{file}{rank}"))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[u8; 2]> for Square {
    fn from([x, y]: [u8; 2]) -> Self {
        Square::new(x, y)
    }
}

impl From<Square> for [u8; 2] {
    fn from(square: Square) -> Self {
        [square.x, square.y]
    }
}

/// Authoritative 8x8 grid of codec values, row-major: `cells[y][x]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot(pub [[i32; BOARD_SIZE]; BOARD_SIZE]);

impl BoardSnapshot {
    pub fn cell(&self, x: usize, y: usize) -> i32 {
        self.0[y][x]
    }
}

// ============================================================================
// Outbound
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    JoinGame { game_id: String },
    RequestState,
    MovePiece { from: Square, to: Square },
    Disconnect,
}

impl OutboundMessage {
    pub fn message_type(&self) -> u16 {
        match self {
            OutboundMessage::JoinGame { .. } => JOIN_GAME,
            OutboundMessage::RequestState => REQUEST_STATE,
            OutboundMessage::MovePiece { .. } => MOVE_PIECE,
            OutboundMessage::Disconnect => DISCONNECT,
        }
    }
}

/// An outbound message stamped with the session identifiers known so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireRequest", try_from = "WireRequest")]
pub struct Request {
    pub game_id: Option<String>,
    pub player_id: Option<String>,
    pub message: OutboundMessage,
}

impl Request {
    /// A request sent before any session exists.
    pub fn anonymous(message: OutboundMessage) -> Self {
        Self {
            game_id: None,
            player_id: None,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMove {
    from: Square,
    to: Square,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    message_type: u16,
    #[serde(default)]
    game_id: Option<String>,
    #[serde(default)]
    player_id: Option<String>,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    piece_move: Option<WireMove>,
}

impl From<Request> for WireRequest {
    fn from(request: Request) -> Self {
        let message_type = request.message.message_type();
        let mut game_id = request.game_id;
        let mut piece_move = None;

        match request.message {
            OutboundMessage::JoinGame { game_id: requested } => game_id = Some(requested),
            OutboundMessage::MovePiece { from, to } => piece_move = Some(WireMove { from, to }),
            OutboundMessage::RequestState | OutboundMessage::Disconnect => {}
        }

        WireRequest {
            message_type,
            game_id,
            player_id: request.player_id,
            piece_move,
        }
    }
}

impl TryFrom<WireRequest> for Request {
    type Error = ProtocolError;

    fn try_from(wire: WireRequest) -> Result<Self, Self::Error> {
        let message = match wire.message_type {
            JOIN_GAME => OutboundMessage::JoinGame {
                game_id: wire.game_id.clone().ok_or(ProtocolError::MissingField {
                    message_type: JOIN_GAME,
                    field: "gameId",
                })?,
            },
            REQUEST_STATE => OutboundMessage::RequestState,
            MOVE_PIECE => {
                let WireMove { from, to } = wire.piece_move.ok_or(ProtocolError::MissingField {
                    message_type: MOVE_PIECE,
                    field: "move",
                })?;
                OutboundMessage::MovePiece { from, to }
            }
            DISCONNECT => OutboundMessage::Disconnect,
            other => return Err(ProtocolError::UnknownMessageType(other)),
        };

        Ok(Request {
            game_id: wire.game_id,
            player_id: wire.player_id,
            message,
        })
    }
}

// ============================================================================
// Inbound
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Joined, but the second seat is still empty. A join reply carries the
    /// assigned color; a poll reply does not.
    WaitForOpponent { player_color: Option<PieceColor> },
    /// Both seats taken. A join reply carries only the color; a poll reply
    /// also carries the position.
    GameStarted {
        player_color: PieceColor,
        board: Option<BoardSnapshot>,
        turn: Option<PieceColor>,
    },
    /// Authoritative position. Also the peer's answer to a rejected move.
    StateSync {
        board: BoardSnapshot,
        turn: PieceColor,
        player_color: Option<PieceColor>,
    },
    MoveAccepted,
    GameEnded {
        board: BoardSnapshot,
        winner: PieceColor,
    },
    /// Acknowledges our own disconnect, or reports that the other player left.
    PlayerDisconnected,
    OpponentDisconnected,
}

impl InboundMessage {
    pub fn message_type(&self) -> u16 {
        match self {
            InboundMessage::WaitForOpponent { .. } => WAIT_FOR_OPPONENT,
            InboundMessage::GameStarted { .. } => GAME_STARTED,
            InboundMessage::StateSync { .. } => STATE_SYNC,
            InboundMessage::MoveAccepted => MOVE_ACCEPTED,
            InboundMessage::GameEnded { .. } => GAME_ENDED,
            InboundMessage::PlayerDisconnected => PLAYER_DISCONNECTED,
            InboundMessage::OpponentDisconnected => OPPONENT_DISCONNECTED,
        }
    }
}

/// A decoded reply plus the identifiers the peer echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub struct Response {
    pub game_id: Option<String>,
    pub player_id: Option<String>,
    pub message: InboundMessage,
}

impl Response {
    pub fn new(game_id: impl Into<String>, player_id: impl Into<String>, message: InboundMessage) -> Self {
        Self {
            game_id: Some(game_id.into()),
            player_id: Some(player_id.into()),
            message,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    message_type: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    game_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    board: Option<BoardSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_turn: Option<PieceColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player_color: Option<PieceColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winner: Option<PieceColor>,
}

fn required<T>(value: Option<T>, message_type: u16, field: &'static str) -> Result<T, ProtocolError> {
    value.ok_or(ProtocolError::MissingField {
        message_type,
        field,
    })
}

impl TryFrom<WireResponse> for Response {
    type Error = ProtocolError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        let tag = wire.message_type;
        let message = match tag {
            WAIT_FOR_OPPONENT => InboundMessage::WaitForOpponent {
                player_color: wire.player_color,
            },
            GAME_STARTED => InboundMessage::GameStarted {
                player_color: required(wire.player_color, tag, "playerColor")?,
                board: wire.board,
                turn: wire.current_turn,
            },
            STATE_SYNC => InboundMessage::StateSync {
                board: required(wire.board, tag, "board")?,
                turn: required(wire.current_turn, tag, "currentTurn")?,
                player_color: wire.player_color,
            },
            MOVE_ACCEPTED => InboundMessage::MoveAccepted,
            GAME_ENDED => InboundMessage::GameEnded {
                board: required(wire.board, tag, "board")?,
                winner: required(wire.winner, tag, "winner")?,
            },
            PLAYER_DISCONNECTED => InboundMessage::PlayerDisconnected,
            OPPONENT_DISCONNECTED => InboundMessage::OpponentDisconnected,
            other => return Err(ProtocolError::UnknownMessageType(other)),
        };

        Ok(Response {
            game_id: wire.game_id,
            player_id: wire.player_id,
            message,
        })
    }
}

impl From<Response> for WireResponse {
    fn from(response: Response) -> Self {
        let mut wire = WireResponse {
            message_type: response.message.message_type(),
            game_id: response.game_id,
            player_id: response.player_id,
            ..WireResponse::default()
        };

        match response.message {
            InboundMessage::WaitForOpponent { player_color } => wire.player_color = player_color,
            InboundMessage::GameStarted {
                player_color,
                board,
                turn,
            } => {
                wire.player_color = Some(player_color);
                wire.board = board;
                wire.current_turn = turn;
            }
            InboundMessage::StateSync {
                board,
                turn,
                player_color,
            } => {
                wire.board = Some(board);
                wire.current_turn = Some(turn);
                wire.player_color = player_color;
            }
            InboundMessage::GameEnded { board, winner } => {
                wire.board = Some(board);
                wire.winner = Some(winner);
            }
            InboundMessage::MoveAccepted
            | InboundMessage::PlayerDisconnected
            | InboundMessage::OpponentDisconnected => {}
        }

        wire
    }
}
