//! Session poller
//!
//! Once a join completes a ticker task fires every poll interval and asks
//! the event loop to request the authoritative state. The ticker never
//! touches game state itself; replies come back through the event loop like
//! every other event and are folded in by [`fold_poll`].
//!
//! The interval is the whole retry policy: a failed tick is logged and the
//! next tick tries again. Ticks missed while the loop was busy are skipped,
//! not replayed.

use super::game_client::LoopEvent;
use crate::game::state::{ClientState, Effect};
use shared::protocol::InboundMessage;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;
use uuid::Uuid;

/// Handle to the ticker task; dropping it stops the ticks.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(self) {
        // Drop aborts.
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start ticking for the session identified by `token`.
///
/// The first tick fires one `period` after the call.
pub fn spawn_poller(token: Uuid, period: Duration, events: UnboundedSender<LoopEvent>) -> PollerHandle {
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if events.send(LoopEvent::PollTick { token }).is_err() {
                debug!("[POLL] Event loop gone, stopping");
                break;
            }
        }
    });

    PollerHandle { task }
}

/// Identifies one poll request: which session sent it and the move epoch at
/// the time it was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    pub token: Uuid,
    pub epoch: u64,
}

impl PollTicket {
    pub fn issue(token: Uuid, state: &ClientState) -> Self {
        Self {
            token,
            epoch: state.move_epoch(),
        }
    }
}

/// Fold a poll reply into the state.
///
/// Position updates are dropped when a move was made or settled after the
/// poll was sent, or while a move is still awaiting its reply; the move
/// reply (or the next tick) carries the newer truth. Game end and
/// disconnects are always applied.
pub fn fold_poll(state: &mut ClientState, ticket: PollTicket, reply: InboundMessage) -> Vec<Effect> {
    let carries_position = matches!(
        reply,
        InboundMessage::StateSync { .. } | InboundMessage::GameStarted { .. }
    );

    if carries_position && is_stale(state, ticket) {
        debug!(
            "[POLL] Dropping stale snapshot (epoch {} < {}, {} move(s) in flight)",
            ticket.epoch,
            state.move_epoch(),
            state.moves_in_flight()
        );
        return Vec::new();
    }

    state.apply_inbound(reply)
}

fn is_stale(state: &ClientState, ticket: PollTicket) -> bool {
    ticket.epoch < state.move_epoch() || state.moves_in_flight() > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::BoardState;
    use crate::game::selection::MoveAttempt;
    use crate::game::state::GameOutcome;
    use crate::game::sync::{begin_move, reconcile_move};
    use shared::piece::PieceColor;
    use shared::protocol::{BoardSnapshot, Square};

    fn e2e4() -> MoveAttempt {
        MoveAttempt {
            from: Square::new(4, 6),
            to: Square::new(4, 4),
        }
    }

    fn standard_sync(turn: PieceColor) -> InboundMessage {
        InboundMessage::StateSync {
            board: BoardState::standard().to_snapshot(),
            turn,
            player_color: Some(PieceColor::White),
        }
    }

    #[test]
    fn test_waiting_reply_is_a_no_op() {
        let mut state = ClientState::new();
        let ticket = PollTicket::issue(Uuid::new_v4(), &state);
        let effects = fold_poll(
            &mut state,
            ticket,
            InboundMessage::WaitForOpponent { player_color: None },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_first_snapshot_displays_board() {
        let mut state = ClientState::new();
        let ticket = PollTicket::issue(Uuid::new_v4(), &state);

        let effects = fold_poll(&mut state, ticket, standard_sync(PieceColor::White));

        assert!(effects.contains(&Effect::GameDisplayed(PieceColor::White)));
        assert_eq!(state.board(), &BoardState::standard());
    }

    #[test]
    fn test_snapshot_issued_before_move_is_dropped() {
        let mut state = ClientState::new();
        state.display(PieceColor::White);
        let token = Uuid::new_v4();

        let early = PollTicket::issue(token, &state);
        let pending = begin_move(&mut state, e2e4()).unwrap();
        let optimistic = state.board().clone();

        // The pre-move snapshot lands while the move is in flight.
        assert!(fold_poll(&mut state, early, standard_sync(PieceColor::White)).is_empty());
        assert_eq!(state.board(), &optimistic);

        reconcile_move(&mut state, &pending, InboundMessage::MoveAccepted);

        // Still older than the settled move.
        assert!(fold_poll(&mut state, early, standard_sync(PieceColor::White)).is_empty());
        assert_eq!(state.board(), &optimistic);
        assert_eq!(state.turn(), PieceColor::Black);
    }

    #[test]
    fn test_snapshot_issued_after_settle_applies() {
        let mut state = ClientState::new();
        state.display(PieceColor::White);
        let token = Uuid::new_v4();

        let pending = begin_move(&mut state, e2e4()).unwrap();
        reconcile_move(&mut state, &pending, InboundMessage::MoveAccepted);

        let fresh = PollTicket::issue(token, &state);
        let effects = fold_poll(
            &mut state,
            fresh,
            InboundMessage::StateSync {
                board: BoardSnapshot::default(),
                turn: PieceColor::White,
                player_color: None,
            },
        );

        assert!(effects.contains(&Effect::Repaint));
        assert_eq!(state.board().piece_count(), 0);
    }

    #[test]
    fn test_game_end_is_never_stale() {
        let mut state = ClientState::new();
        state.display(PieceColor::White);
        let early = PollTicket::issue(Uuid::new_v4(), &state);
        begin_move(&mut state, e2e4()).unwrap();

        let effects = fold_poll(
            &mut state,
            early,
            InboundMessage::GameEnded {
                board: BoardState::standard().to_snapshot(),
                winner: PieceColor::Black,
            },
        );

        assert_eq!(
            effects.last(),
            Some(&Effect::Terminate(GameOutcome::Won(PieceColor::Black)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_fires_each_period_until_stopped() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let token = Uuid::new_v4();
        let handle = spawn_poller(token, Duration::from_secs(1), tx);

        for _ in 0..3 {
            match rx.recv().await {
                Some(LoopEvent::PollTick { token: ticked }) => assert_eq!(ticked, token),
                other => panic!("unexpected event: {other:?}"),
            }
        }

        handle.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.recv().await.is_none(), "sender should be dropped with the task");
    }
}
