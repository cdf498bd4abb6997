//! Client-side game state
//!
//! [`ClientState`] is everything the renderer reads and the two reconcilers
//! (move replies, poll replies) write: board, turn, gesture, phase, and the
//! move epoch used to order snapshots against local moves. It is owned by a
//! single writer, the client event loop; nothing here is shared.
//!
//! Reconciliation never talks to the network. It returns [`Effect`]s and the
//! event loop carries them out (repaint, stop polling, send disconnect).
//!
//! # Phases
//!
//! ```text
//! Waiting --(game started / first snapshot)--> Playing --(end / disconnect / leave)--> Finished
//! ```
//!
//! Clicks are only accepted while `Playing`.

use super::board::BoardState;
use super::error::{GameError, GameResult};
use super::selection::{Interaction, MoveAttempt};
use shared::piece::PieceColor;
use shared::protocol::{BoardSnapshot, InboundMessage, Square};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Joined (or joining) but no board on screen yet
    #[default]
    Waiting,
    Playing,
    Finished,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won(PieceColor),
    OpponentDisconnected,
    Left,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Won(color) => write!(f, "{color} has won!!!"),
            GameOutcome::OpponentDisconnected => f.write_str("Opponent disconnected"),
            GameOutcome::Left => f.write_str("Left the game"),
        }
    }
}

/// Work the event loop performs after a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Repaint,
    TurnChanged(PieceColor),
    GameDisplayed(PieceColor),
    /// A snapshot failed to decode; nothing was applied
    SnapshotRejected(GameError),
    /// Stop polling, notify the peer, tear the session down
    Terminate(GameOutcome),
}

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    board: BoardState,
    turn: PieceColor,
    interaction: Interaction,
    phase: GamePhase,
    player_color: Option<PieceColor>,
    pub(crate) move_epoch: u64,
    pub(crate) moves_in_flight: usize,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Render-facing accessors
    // ------------------------------------------------------------------

    pub fn current_board(&self) -> BoardSnapshot {
        self.board.to_snapshot()
    }

    pub fn current_selection(&self) -> Option<Square> {
        self.interaction.selected()
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn turn(&self) -> PieceColor {
        self.turn
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player_color(&self) -> Option<PieceColor> {
        self.player_color
    }

    pub fn move_epoch(&self) -> u64 {
        self.move_epoch
    }

    pub fn moves_in_flight(&self) -> usize {
        self.moves_in_flight
    }

    pub(crate) fn board_mut(&mut self) -> &mut BoardState {
        &mut self.board
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Record the color assigned by the peer on join.
    pub fn assign_color(&mut self, color: PieceColor) {
        self.player_color = Some(color);
    }

    /// Put a fresh standard board on screen and start accepting clicks.
    pub fn display(&mut self, color: PieceColor) -> Vec<Effect> {
        info!("[SESSION] Showing board, playing {}", color);
        self.player_color = Some(color);
        self.board.initialize_standard();
        self.turn = PieceColor::White;
        self.interaction.clear();
        self.phase = GamePhase::Playing;
        vec![
            Effect::GameDisplayed(color),
            Effect::TurnChanged(self.turn),
            Effect::Repaint,
        ]
    }

    /// Stop accepting clicks. The last board stays readable.
    pub fn finish(&mut self) {
        self.interaction.clear();
        self.phase = GamePhase::Finished;
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Feed a square click into the gesture machine.
    ///
    /// Ignored unless a game is on screen. Off-board clicks are an error and
    /// leave the gesture untouched.
    pub fn square_clicked(&mut self, x: u8, y: u8) -> GameResult<Option<MoveAttempt>> {
        if self.phase != GamePhase::Playing {
            debug!("[INPUT] Ignoring click at ({}, {}) in phase {:?}", x, y, self.phase);
            return Ok(None);
        }

        let square = Square::new(x, y);
        if !square.is_on_board() {
            return Err(GameError::OutOfBounds { x, y });
        }

        Ok(self.interaction.click(square))
    }

    // ------------------------------------------------------------------
    // Authoritative updates
    // ------------------------------------------------------------------

    /// Replace board and turn from an authoritative snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &BoardSnapshot, turn: Option<PieceColor>) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.board.replace_from(snapshot) {
            Ok(()) => effects.push(Effect::Repaint),
            Err(err) => {
                warn!("[SYNC] Discarding malformed snapshot: {}", err);
                return vec![Effect::SnapshotRejected(err)];
            }
        }

        if let Some(turn) = turn {
            self.turn = turn;
            effects.push(Effect::TurnChanged(turn));
        }
        effects
    }

    pub(crate) fn set_turn(&mut self, turn: PieceColor) -> Effect {
        self.turn = turn;
        Effect::TurnChanged(turn)
    }

    /// Fold one inbound message into the state, the way a poll reply is
    /// handled. Move-specific replies are interpreted by the move
    /// synchronizer before reaching here.
    pub fn apply_inbound(&mut self, message: InboundMessage) -> Vec<Effect> {
        if self.phase == GamePhase::Finished {
            debug!("[SYNC] Game already finished, ignoring {:?}", message.message_type());
            return Vec::new();
        }

        match message {
            InboundMessage::WaitForOpponent { .. } | InboundMessage::MoveAccepted => Vec::new(),
            InboundMessage::GameStarted {
                player_color,
                board,
                turn,
            } => {
                let mut effects = self.display_if_needed(Some(player_color));
                if let Some(board) = board {
                    effects.extend(self.apply_snapshot(&board, turn));
                } else if let Some(turn) = turn {
                    effects.push(self.set_turn(turn));
                }
                effects
            }
            InboundMessage::StateSync {
                board,
                turn,
                player_color,
            } => {
                let mut effects = self.display_if_needed(player_color);
                effects.extend(self.apply_snapshot(&board, Some(turn)));
                effects
            }
            InboundMessage::GameEnded { board, winner } => {
                let mut effects = self.apply_snapshot(&board, None);
                info!("[SESSION] Game ended, winner: {}", winner);
                self.finish();
                effects.push(Effect::Terminate(GameOutcome::Won(winner)));
                effects
            }
            InboundMessage::PlayerDisconnected | InboundMessage::OpponentDisconnected => {
                info!("[SESSION] Opponent disconnected");
                self.finish();
                vec![Effect::Terminate(GameOutcome::OpponentDisconnected)]
            }
        }
    }

    fn display_if_needed(&mut self, color: Option<PieceColor>) -> Vec<Effect> {
        if self.phase != GamePhase::Waiting {
            return Vec::new();
        }
        match color.or(self.player_color) {
            Some(color) => self.display(color),
            None => {
                warn!("[SESSION] Game started but no color was ever assigned");
                Vec::new()
            }
        }
    }
}
