//! Client event loop
//!
//! [`GameClient`] is the only writer of [`ClientState`] and the only owner of
//! the [`Session`]. Everything that can change the game arrives on one queue
//! and is applied in arrival order:
//!
//! - user commands (square clicks, leave)
//! - poll ticks from the ticker task
//! - poll replies and move replies from request tasks
//!
//! Requests run as separate tasks so a slow move never holds up polling, and
//! vice versa. Their replies are tagged with the session token and dropped if
//! that session is gone by the time they arrive.
//!
//! # Flow
//!
//! ```text
//! click ─▶ Interaction ─▶ begin_move (optimistic) ─▶ spawn MOVE_PIECE ─┐
//! tick  ─▶ spawn REQUEST_STATE ────────────────────────────────────────┤
//!                                                                      ▼
//!                                              events queue ─▶ reconcile ─▶ effects ─▶ view
//! ```

use super::client::RemotePeer;
use super::error::{NetworkError, NetworkResult};
use super::poller::{fold_poll, spawn_poller, PollTicket};
use super::session::{JoinStatus, Session};
use crate::game::selection::MoveAttempt;
use crate::game::state::{ClientState, Effect, GameOutcome};
use crate::game::sync::{abandon_move, begin_move, reconcile_move, PendingMove};
use crate::rendering::BoardView;
use shared::protocol::{OutboundMessage, Request, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Input from the user-facing side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Board coordinates, already translated from screen space
    SquareClicked { x: u8, y: u8 },
    Leave,
}

/// Everything the event loop reacts to besides user commands
#[derive(Debug)]
pub enum LoopEvent {
    PollTick {
        token: Uuid,
    },
    PollReply {
        ticket: PollTicket,
        result: NetworkResult<Response>,
    },
    MoveReply {
        token: Uuid,
        pending: PendingMove,
        result: NetworkResult<Response>,
    },
}

pub struct GameClient<P: RemotePeer, V: BoardView> {
    peer: Arc<P>,
    view: V,
    poll_interval: Duration,
    state: ClientState,
    session: Option<Session>,
    outcome: Option<GameOutcome>,
    events_tx: UnboundedSender<LoopEvent>,
    events_rx: UnboundedReceiver<LoopEvent>,
}

impl<P: RemotePeer, V: BoardView> GameClient<P, V> {
    pub fn new(peer: P, view: V, poll_interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            peer: Arc::new(peer),
            view,
            poll_interval,
            state: ClientState::new(),
            session: None,
            outcome: None,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn peer(&self) -> &P {
        &self.peer
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Join `game_id` and start polling.
    ///
    /// A failed join leaves the client without a session.
    pub async fn join(&mut self, game_id: &str) -> NetworkResult<JoinStatus> {
        info!("[NETWORK] Joining game {}", game_id);
        let reply = self
            .peer
            .exchange(Request::anonymous(OutboundMessage::JoinGame {
                game_id: game_id.to_string(),
            }))
            .await?;

        let (mut session, status) = Session::from_join_reply(reply)?;
        let color = session.color();

        self.state = ClientState::new();
        self.state.assign_color(color);
        self.outcome = None;

        session.attach_poller(spawn_poller(
            session.token(),
            self.poll_interval,
            self.events_tx.clone(),
        ));
        self.session = Some(session);

        match status {
            JoinStatus::Started => {
                let effects = self.state.display(color);
                self.apply_effects(effects).await;
            }
            JoinStatus::WaitingForOpponent => {
                info!("[SESSION] Waiting for other player...");
                self.view.waiting_for_opponent();
            }
        }

        Ok(status)
    }

    /// Process commands and events until the session ends.
    ///
    /// Closing the command channel counts as leaving.
    pub async fn run(&mut self, commands: &mut UnboundedReceiver<ClientCommand>) -> GameOutcome {
        let mut commands_open = true;

        loop {
            if self.session.is_none() {
                return self.outcome.unwrap_or(GameOutcome::Left);
            }

            tokio::select! {
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        commands_open = false;
                        self.terminate(GameOutcome::Left).await;
                    }
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event).await,
            }
        }
    }

    pub async fn handle_command(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::SquareClicked { x, y } => match self.state.square_clicked(x, y) {
                Ok(Some(attempt)) => self.attempt_move(attempt),
                Ok(None) => self.view.repaint(&self.state),
                Err(err) => {
                    warn!("[INPUT] {}", err);
                    self.view.report_error(&err);
                }
            },
            ClientCommand::Leave => self.terminate(GameOutcome::Left).await,
        }
    }

    fn attempt_move(&mut self, attempt: MoveAttempt) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let pending = match begin_move(&mut self.state, attempt) {
            Ok(pending) => pending,
            Err(err) => {
                // Selection is not checked against the board, so an empty
                // origin square ends up here.
                error!("[MOVE] Aborting move {} -> {}: {}", attempt.from, attempt.to, err);
                self.view.repaint(&self.state);
                return;
            }
        };
        self.view.repaint(&self.state);

        let request = session.request(OutboundMessage::MovePiece {
            from: attempt.from,
            to: attempt.to,
        });
        let token = session.token();
        let peer = Arc::clone(&self.peer);
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let result = peer.exchange(request).await;
            let _ = events.send(LoopEvent::MoveReply {
                token,
                pending,
                result,
            });
        });
    }

    pub async fn handle_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::PollTick { token } => {
                if self.is_current(token) {
                    self.request_state(token);
                }
            }
            LoopEvent::PollReply { ticket, result } => {
                if !self.is_current(ticket.token) {
                    debug!("[POLL] Reply for a closed session, ignoring");
                    return;
                }
                match result {
                    Ok(reply) => {
                        let effects = fold_poll(&mut self.state, ticket, reply.message);
                        self.apply_effects(effects).await;
                    }
                    Err(err) => warn!("[POLL] Poll failed, retrying next tick: {}", err),
                }
            }
            LoopEvent::MoveReply {
                token,
                pending,
                result,
            } => {
                if !self.is_current(token) {
                    debug!("[MOVE] Reply for a closed session, ignoring");
                    return;
                }
                match result {
                    Ok(reply) => {
                        let effects = reconcile_move(&mut self.state, &pending, reply.message);
                        self.apply_effects(effects).await;
                    }
                    Err(err) => {
                        abandon_move(&mut self.state, &pending);
                        error!("[MOVE] Move request failed: {}", err);
                        self.view.report_error(&err);
                    }
                }
            }
        }
    }

    fn request_state(&self, token: Uuid) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let ticket = PollTicket::issue(token, &self.state);
        let request = session.request(OutboundMessage::RequestState);
        let peer = Arc::clone(&self.peer);
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let result = peer.exchange(request).await;
            let _ = events.send(LoopEvent::PollReply { ticket, result });
        });
    }

    fn is_current(&self, token: Uuid) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.token() == token)
    }

    async fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Repaint => self.view.repaint(&self.state),
                Effect::TurnChanged(turn) => self.view.turn_changed(turn),
                Effect::GameDisplayed(color) => self.view.game_displayed(color),
                Effect::SnapshotRejected(err) => {
                    self.view.report_error(&NetworkError::from(err));
                }
                Effect::Terminate(outcome) => self.terminate(outcome).await,
            }
        }
    }

    /// Tear the session down: stop polling, tell the peer, report the outcome.
    ///
    /// Only the first call per session does anything.
    async fn terminate(&mut self, outcome: GameOutcome) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        session.stop_polling();
        self.state.finish();

        info!("[SESSION] Ending session for game {}: {}", session.game_id(), outcome);
        match self
            .peer
            .exchange(session.request(OutboundMessage::Disconnect))
            .await
        {
            Ok(_) => debug!("[NETWORK] Disconnect acknowledged"),
            Err(err) => warn!("[NETWORK] Disconnect notification failed: {}", err),
        }

        self.outcome = Some(outcome);
        self.view.session_ended(outcome);
    }
}
