//! Shared test fixtures: a scripted in-memory peer and a recording view.

#![allow(dead_code)]

use async_trait::async_trait;
use netchess::game::board::BoardState;
use netchess::game::state::{ClientState, GameOutcome};
use netchess::networking::{NetworkError, NetworkResult, RemotePeer};
use netchess::rendering::BoardView;
use shared::piece::PieceColor;
use shared::protocol::{BoardSnapshot, InboundMessage, OutboundMessage, Request, Response, Square};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GAME_ID: &str = "game-1";
pub const PLAYER_ID: &str = "player-1";

/// What the scripted peer does with one request
pub enum Script {
    Reply(InboundMessage),
    Delayed(Duration, InboundMessage),
    /// Answer with HTTP 503
    Fail,
}

type Responder = dyn Fn(&Request) -> Script + Send + Sync;

/// In-memory [`RemotePeer`] that logs every request and answers from a script
pub struct ScriptedPeer {
    log: Arc<Mutex<Vec<Request>>>,
    responder: Box<Responder>,
}

impl ScriptedPeer {
    pub fn new(responder: impl Fn(&Request) -> Script + Send + Sync + 'static) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, message_type: u16) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.message.message_type() == message_type)
            .count()
    }
}

#[async_trait]
impl RemotePeer for ScriptedPeer {
    async fn exchange(&self, request: Request) -> NetworkResult<Response> {
        self.log.lock().unwrap().push(request.clone());

        let message = match (self.responder)(&request) {
            Script::Reply(message) => message,
            Script::Delayed(delay, message) => {
                tokio::time::sleep(delay).await;
                message
            }
            Script::Fail => return Err(NetworkError::Status { status: 503 }),
        };
        Ok(Response::new(GAME_ID, PLAYER_ID, message))
    }
}

/// Everything a [`BoardView`] was told, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Repaint(BoardSnapshot),
    TurnChanged(PieceColor),
    GameDisplayed(PieceColor),
    Waiting,
    SessionEnded(GameOutcome),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn ended(&self) -> Vec<GameOutcome> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::SessionEnded(outcome) => Some(*outcome),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ViewEvent::Error(_)))
            .count()
    }
}

impl BoardView for RecordingView {
    fn repaint(&mut self, state: &ClientState) {
        self.events.push(ViewEvent::Repaint(state.current_board()));
    }

    fn turn_changed(&mut self, turn: PieceColor) {
        self.events.push(ViewEvent::TurnChanged(turn));
    }

    fn game_displayed(&mut self, color: PieceColor) {
        self.events.push(ViewEvent::GameDisplayed(color));
    }

    fn waiting_for_opponent(&mut self) {
        self.events.push(ViewEvent::Waiting);
    }

    fn session_ended(&mut self, outcome: GameOutcome) {
        self.events.push(ViewEvent::SessionEnded(outcome));
    }

    fn report_error(&mut self, error: &dyn Error) {
        self.events.push(ViewEvent::Error(error.to_string()));
    }
}

pub fn game_started(color: PieceColor) -> InboundMessage {
    InboundMessage::GameStarted {
        player_color: color,
        board: None,
        turn: None,
    }
}

pub fn standard_board() -> BoardSnapshot {
    BoardState::standard().to_snapshot()
}

/// Standard position after white's e2-e4
pub fn board_after_e4() -> BoardSnapshot {
    let mut snapshot = standard_board();
    snapshot.0[4][4] = snapshot.0[6][4];
    snapshot.0[6][4] = shared::piece::EMPTY;
    snapshot
}

pub fn sync(board: BoardSnapshot, turn: PieceColor) -> InboundMessage {
    InboundMessage::StateSync {
        board,
        turn,
        player_color: None,
    }
}

pub fn is_move(request: &Request, from: Square, to: Square) -> bool {
    request.message == OutboundMessage::MovePiece { from, to }
}
