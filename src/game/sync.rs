//! Move synchronizer
//!
//! A move is applied to the local board before the peer has seen it, then
//! reconciled when the reply arrives:
//!
//! - `MoveAccepted` keeps the optimistic board and hands the turn to the
//!   mover's opponent
//! - `StateSync` throws the optimistic board away in favour of the snapshot
//! - `GameEnded` applies the final snapshot and ends the session
//!
//! A transport failure leaves the optimistic board in place; only an explicit
//! resync rolls it back.
//!
//! Every optimistic move and every reconciled reply bumps the move epoch.
//! Poll snapshots issued under an older epoch are dropped by the poller, so a
//! snapshot that predates a move cannot overwrite it.

use super::error::{GameError, GameResult};
use super::selection::MoveAttempt;
use super::state::{ClientState, Effect};
use shared::piece::PieceColor;
use shared::protocol::InboundMessage;
use tracing::{debug, info};

/// An optimistic move waiting for the peer's verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub attempt: MoveAttempt,
    /// Color of the moved piece; the turn passes to its opponent on accept
    pub mover: PieceColor,
    /// Epoch after the optimistic update was applied
    pub epoch: u64,
}

/// Apply `attempt` to the local board ahead of confirmation.
///
/// Fails without touching the board when `from` is empty or either square is
/// off the grid.
pub fn begin_move(state: &mut ClientState, attempt: MoveAttempt) -> GameResult<PendingMove> {
    let MoveAttempt { from, to } = attempt;
    // Validate the destination before lifting the piece so a bad target
    // leaves the board untouched.
    state.board().piece_at(to)?;

    let piece = state
        .board()
        .piece_at(from)?
        .ok_or(GameError::PieceNotFound { x: from.x, y: from.y })?;

    let board = state.board_mut();
    board.clear(from.x, from.y)?;
    board.set(piece, to.x, to.y)?;

    state.move_epoch += 1;
    state.moves_in_flight += 1;

    info!("[MOVE] Optimistic {} -> {} ({:?})", from, to, piece.kind);
    Ok(PendingMove {
        attempt,
        mover: piece.color,
        epoch: state.move_epoch,
    })
}

/// Reconcile the peer's reply to `pending`.
pub fn reconcile_move(state: &mut ClientState, pending: &PendingMove, reply: InboundMessage) -> Vec<Effect> {
    settle(state);

    match reply {
        InboundMessage::MoveAccepted => {
            debug!("[MOVE] {} -> {} accepted", pending.attempt.from, pending.attempt.to);
            vec![state.set_turn(pending.mover.opponent())]
        }
        InboundMessage::StateSync { .. } => {
            info!("[MOVE] Invalid move, synchronizing board state...");
            state.apply_inbound(reply)
        }
        other => state.apply_inbound(other),
    }
}

/// Reconcile a move whose request never got an answer.
///
/// The optimistic board stays; the move is no longer in flight.
pub fn abandon_move(state: &mut ClientState, pending: &PendingMove) {
    debug!("[MOVE] {} -> {} left unconfirmed", pending.attempt.from, pending.attempt.to);
    settle(state);
}

fn settle(state: &mut ClientState) {
    state.moves_in_flight = state.moves_in_flight.saturating_sub(1);
    state.move_epoch += 1;
}
