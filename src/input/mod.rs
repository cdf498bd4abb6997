//! Text input for the command-line client
//!
//! Turns a typed line into [`ClientCommand`]s. Squares can be given in
//! algebraic notation (`e2 e4`) or as raw board coordinates (`4 6 4 4`);
//! each square is one click, so `e2 e4` is a whole move gesture and `e2`
//! alone only selects.
//!
//! `quit`, `exit` and `leave` leave the game.

use crate::game::error::{GameError, GameResult};
use crate::networking::ClientCommand;
use shared::protocol::Square;

pub fn parse_line(line: &str) -> GameResult<Vec<ClientCommand>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.as_slice() {
        [] => return Ok(Vec::new()),
        [word] if matches!(word.to_ascii_lowercase().as_str(), "quit" | "exit" | "leave") => {
            return Ok(vec![ClientCommand::Leave]);
        }
        _ => {}
    }

    let numeric: Option<Vec<u8>> = tokens.iter().map(|t| t.parse::<u8>().ok()).collect();
    let squares = match numeric {
        Some(values) => {
            if values.len() % 2 != 0 {
                return Err(GameError::InvalidSquare {
                    notation: line.trim().to_string(),
                });
            }
            values
                .chunks_exact(2)
                .map(|pair| Square::new(pair[0], pair[1]))
                .collect()
        }
        None => tokens
            .iter()
            .map(|token| {
                Square::from_algebraic(token).ok_or_else(|| GameError::InvalidSquare {
                    notation: token.to_string(),
                })
            })
            .collect::<GameResult<Vec<_>>>()?,
    };

    Ok(squares
        .into_iter()
        .map(|square| ClientCommand::SquareClicked {
            x: square.x,
            y: square.y,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(x: u8, y: u8) -> ClientCommand {
        ClientCommand::SquareClicked { x, y }
    }

    #[test]
    fn test_algebraic_move() {
        assert_eq!(parse_line("e2 e4"), Ok(vec![click(4, 6), click(4, 4)]));
    }

    #[test]
    fn test_coordinate_pairs() {
        assert_eq!(parse_line("4 6"), Ok(vec![click(4, 6)]));
        assert_eq!(parse_line(" 4 6  4 4 "), Ok(vec![click(4, 6), click(4, 4)]));
    }

    #[test]
    fn test_coordinates_are_not_bounds_checked_here() {
        // The board reports off-grid squares.
        assert_eq!(parse_line("9 9"), Ok(vec![click(9, 9)]));
    }

    #[test]
    fn test_leave_words() {
        for word in ["quit", "EXIT", "leave"] {
            assert_eq!(parse_line(word), Ok(vec![ClientCommand::Leave]));
        }
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("   "), Ok(Vec::new()));
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(parse_line("e9"), Err(GameError::InvalidSquare { .. })));
        assert!(matches!(parse_line("4 6 4"), Err(GameError::InvalidSquare { .. })));
    }
}
