//! Session: the identifiers of one joined game
//!
//! Built from the peer's reply to `JoinGame` and owned by the event loop
//! until the game ends, the opponent disconnects, or the user leaves. Every
//! outbound request after the join is stamped with its ids.
//!
//! Each session also gets a random token. Replies are tagged with the token
//! of the session that sent the request, so anything still in flight when a
//! session is torn down is recognizable and dropped.

use super::error::{NetworkError, NetworkResult};
use super::poller::PollerHandle;
use shared::piece::PieceColor;
use shared::protocol::{InboundMessage, OutboundMessage, ProtocolError, Request, Response};
use tracing::info;
use uuid::Uuid;

/// What the join reply said about the second seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStatus {
    WaitingForOpponent,
    Started,
}

#[derive(Debug)]
pub struct Session {
    token: Uuid,
    game_id: String,
    player_id: String,
    color: PieceColor,
    poller: Option<PollerHandle>,
}

impl Session {
    pub fn new(game_id: impl Into<String>, player_id: impl Into<String>, color: PieceColor) -> Self {
        Self {
            token: Uuid::new_v4(),
            game_id: game_id.into(),
            player_id: player_id.into(),
            color,
            poller: None,
        }
    }

    /// Build a session from the peer's answer to `JoinGame`.
    pub fn from_join_reply(reply: Response) -> NetworkResult<(Self, JoinStatus)> {
        let tag = reply.message.message_type();
        let (color, status) = match reply.message {
            InboundMessage::WaitForOpponent {
                player_color: Some(color),
            } => (color, JoinStatus::WaitingForOpponent),
            InboundMessage::GameStarted { player_color, .. } => (player_color, JoinStatus::Started),
            InboundMessage::WaitForOpponent { player_color: None } => {
                return Err(ProtocolError::MissingField {
                    message_type: tag,
                    field: "playerColor",
                }
                .into())
            }
            other => {
                return Err(NetworkError::JoinRejected {
                    message: format!("unexpected reply {:?}", other.message_type()),
                })
            }
        };

        let game_id = reply.game_id.ok_or(ProtocolError::MissingField {
            message_type: tag,
            field: "gameId",
        })?;
        let player_id = reply.player_id.ok_or(ProtocolError::MissingField {
            message_type: tag,
            field: "playerId",
        })?;

        info!(
            "[SESSION] Joined game {} as player {} ({})",
            game_id, player_id, color
        );
        Ok((Session::new(game_id, player_id, color), status))
    }

    pub fn token(&self) -> Uuid {
        self.token
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    /// Stamp `message` with this session's ids
    pub fn request(&self, message: OutboundMessage) -> Request {
        Request {
            game_id: Some(self.game_id.clone()),
            player_id: Some(self.player_id.clone()),
            message,
        }
    }

    pub fn attach_poller(&mut self, poller: PollerHandle) {
        if let Some(previous) = self.poller.replace(poller) {
            previous.stop();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    pub fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }
}
