//! Two-click move gesture
//!
//! The first click picks a square, the second either cancels (same square)
//! or turns the pair into a [`MoveAttempt`]. The pick is a bare coordinate;
//! whether a piece stands there is the move synchronizer's concern.

use shared::protocol::Square;

/// A move handed from the gesture machine to the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveAttempt {
    pub from: Square,
    pub to: Square,
}

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Selected(Square),
}

impl Interaction {
    /// Feed one square click through the machine.
    ///
    /// Always ends in `Selected` after a click from `Idle`, and in `Idle`
    /// after a click from `Selected`.
    pub fn click(&mut self, square: Square) -> Option<MoveAttempt> {
        match *self {
            Interaction::Idle => {
                *self = Interaction::Selected(square);
                None
            }
            Interaction::Selected(from) => {
                *self = Interaction::Idle;
                (from != square).then_some(MoveAttempt { from, to: square })
            }
        }
    }

    pub fn selected(&self) -> Option<Square> {
        match self {
            Interaction::Idle => None,
            Interaction::Selected(square) => Some(*square),
        }
    }

    pub fn clear(&mut self) {
        *self = Interaction::Idle;
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Interaction::Selected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Square = Square::new(4, 6);
    const B: Square = Square::new(4, 4);

    #[test]
    fn test_first_click_selects() {
        let mut interaction = Interaction::default();
        assert_eq!(interaction.click(A), None);
        assert_eq!(interaction, Interaction::Selected(A));
        assert_eq!(interaction.selected(), Some(A));
    }

    #[test]
    fn test_same_square_twice_cancels() {
        let mut interaction = Interaction::default();
        interaction.click(A);
        assert_eq!(interaction.click(A), None, "no move should be dispatched");
        assert_eq!(interaction, Interaction::Idle);
    }

    #[test]
    fn test_two_squares_dispatch_one_move() {
        let mut interaction = Interaction::default();
        interaction.click(A);
        assert_eq!(interaction.click(B), Some(MoveAttempt { from: A, to: B }));
        assert_eq!(interaction, Interaction::Idle);

        // The next click starts a fresh gesture.
        assert_eq!(interaction.click(B), None);
        assert!(interaction.is_selected());
    }

    #[test]
    fn test_clear_drops_selection() {
        let mut interaction = Interaction::Selected(A);
        interaction.clear();
        assert_eq!(interaction.selected(), None);
    }
}
