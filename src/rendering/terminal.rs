//! Plain-text board view
//!
//! Draws the board with file letters and rank numbers, uppercase letters for
//! White and lowercase for Black, and the selected square in brackets:
//!
//! ```text
//!     a  b  c  d  e  f  g  h
//!  8  r  n  b  q  k  b  n  r  8
//!  7  p  p  p  p  p  p  p  p  7
//!  ...
//!  2  P  P  P  P [P] P  P  P  2
//! ```

use super::BoardView;
use crate::game::state::{ClientState, GameOutcome};
use shared::piece::{self, PieceColor};
use shared::protocol::{Square, BOARD_SIZE};
use std::error::Error;
use std::fmt::Write as _;
use std::io::{self, Stdout, Write};
use tracing::warn;

const FILES: &str = "abcdefgh";

/// Render the board as text, row 0 (rank 8) on top.
pub fn render_board(state: &ClientState) -> String {
    let snapshot = state.current_board();
    let selection = state.current_selection();

    let mut out = String::new();
    let header: String = FILES.chars().map(|file| format!(" {file} ")).collect();
    let _ = writeln!(out, "   {header}");

    for y in 0..BOARD_SIZE {
        let rank = BOARD_SIZE - y;
        let _ = write!(out, "{rank:>2} ");
        for x in 0..BOARD_SIZE {
            let symbol = match piece::decode(snapshot.cell(x, y)) {
                Ok(Some(piece)) => piece.symbol(),
                _ => '.',
            };
            if selection == Some(Square::new(x as u8, y as u8)) {
                let _ = write!(out, "[{symbol}]");
            } else {
                let _ = write!(out, " {symbol} ");
            }
        }
        let _ = writeln!(out, " {rank}");
    }

    let _ = write!(out, "   {header}");
    out
}

pub fn turn_label(turn: PieceColor) -> String {
    format!("{turn} Turn")
}

/// [`BoardView`] that writes to a terminal (or any writer)
pub struct TerminalView<W: Write = Stdout> {
    out: W,
}

impl TerminalView<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            warn!("[VIEW] Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> BoardView for TerminalView<W> {
    fn repaint(&mut self, state: &ClientState) {
        let board = render_board(state);
        self.emit(&board);
    }

    fn turn_changed(&mut self, turn: PieceColor) {
        self.emit(&turn_label(turn));
    }

    fn game_displayed(&mut self, color: PieceColor) {
        self.emit(&format!("You are playing: {color}"));
    }

    fn waiting_for_opponent(&mut self) {
        self.emit("Waiting for other player...");
    }

    fn session_ended(&mut self, outcome: GameOutcome) {
        self.emit(&outcome.to_string());
    }

    fn report_error(&mut self, error: &dyn Error) {
        self.emit(&format!("error: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_standard_board() {
        let mut state = ClientState::new();
        state.display(PieceColor::White);

        let text = render_board(&state);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 10);
        assert!(lines[1].starts_with(" 8  r  n  b  q  k  b  n  r "));
        assert!(lines[7].starts_with(" 2  P  P  P  P  P  P  P  P "));
        assert!(lines[4].contains(" .  .  . "));
    }

    #[test]
    fn test_render_marks_selection() {
        let mut state = ClientState::new();
        state.display(PieceColor::White);
        state.square_clicked(4, 6).unwrap();

        let text = render_board(&state);
        assert!(text.contains("[P]"), "selection should be bracketed:\n{text}");
    }

    #[test]
    fn test_view_writes_messages() {
        let mut view = TerminalView::new(Vec::new());
        view.turn_changed(PieceColor::Black);
        view.session_ended(GameOutcome::Won(PieceColor::White));

        let written = String::from_utf8(view.into_inner()).unwrap();
        assert!(written.contains("Black Turn"));
        assert!(written.contains("White has won!!!"));
    }
}
