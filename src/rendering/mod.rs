//! Rendering seam
//!
//! The client does not draw anything itself. The event loop calls a
//! [`BoardView`] after every state change and the view reads whatever it
//! needs from [`ClientState`] (`current_board()`, `current_selection()`,
//! `turn()`, `player_color()`).
//!
//! - `terminal` - plain-text view used by the command-line client

pub mod terminal;

use crate::game::state::{ClientState, GameOutcome};
use shared::piece::PieceColor;
use std::error::Error;

pub use terminal::TerminalView;

/// Receives every visible change of the client state
pub trait BoardView {
    /// Board or selection changed
    fn repaint(&mut self, state: &ClientState);

    fn turn_changed(&mut self, _turn: PieceColor) {}

    /// The board went on screen; `color` is the local player's side
    fn game_displayed(&mut self, _color: PieceColor) {}

    fn waiting_for_opponent(&mut self) {}

    fn session_ended(&mut self, outcome: GameOutcome);

    /// Error sink for failures the user should hear about
    fn report_error(&mut self, error: &dyn Error);
}
