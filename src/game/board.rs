//! Board state: the 8x8 grid of optional pieces
//!
//! Pure data with bounds-checked accessors. Cells are addressed as
//! `(x, y)` with `x` the file and `y` the row as the peer numbers them; row 0
//! holds Black's back rank.
//!
//! Two ways to change it:
//! - [`BoardState::set`] / [`BoardState::clear`] for the optimistic local move
//! - [`BoardState::replace_from`] for authoritative snapshots, which rebuild
//!   the whole grid

use super::error::{GameError, GameResult};
use shared::piece::{self, Piece, PieceColor, PieceKind};
use shared::protocol::{BoardSnapshot, Square, BOARD_SIZE};

/// Standard back rank, file a to file h
const BACK_ROW: [PieceKind; BOARD_SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    cells: [Option<Piece>; BOARD_SIZE * BOARD_SIZE],
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            cells: [None; BOARD_SIZE * BOARD_SIZE],
        }
    }
}

impl BoardState {
    /// Empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Board in the standard starting position
    pub fn standard() -> Self {
        let mut board = Self::new();
        board.initialize_standard();
        board
    }

    fn index(x: u8, y: u8) -> GameResult<usize> {
        let size = BOARD_SIZE as u8;
        if x >= size || y >= size {
            return Err(GameError::OutOfBounds { x, y });
        }
        Ok(y as usize * BOARD_SIZE + x as usize)
    }

    pub fn get(&self, x: u8, y: u8) -> GameResult<Option<Piece>> {
        Ok(self.cells[Self::index(x, y)?])
    }

    pub fn set(&mut self, piece: Piece, x: u8, y: u8) -> GameResult<()> {
        self.cells[Self::index(x, y)?] = Some(piece);
        Ok(())
    }

    pub fn clear(&mut self, x: u8, y: u8) -> GameResult<()> {
        self.cells[Self::index(x, y)?] = None;
        Ok(())
    }

    pub fn piece_at(&self, square: Square) -> GameResult<Option<Piece>> {
        self.get(square.x, square.y)
    }

    /// Place both armies: Black on rows 0-1, White on rows 6-7.
    /// Every other cell is emptied.
    pub fn initialize_standard(&mut self) {
        self.cells = [None; BOARD_SIZE * BOARD_SIZE];

        let last = BOARD_SIZE - 1;
        for (x, kind) in BACK_ROW.iter().enumerate() {
            self.cells[x] = Some(Piece::new(*kind, PieceColor::Black));
            self.cells[BOARD_SIZE + x] = Some(Piece::new(PieceKind::Pawn, PieceColor::Black));
            self.cells[(last - 1) * BOARD_SIZE + x] =
                Some(Piece::new(PieceKind::Pawn, PieceColor::White));
            self.cells[last * BOARD_SIZE + x] = Some(Piece::new(*kind, PieceColor::White));
        }
    }

    /// Discard every cell and decode the snapshot in its place.
    ///
    /// All-or-nothing: if any cell fails to decode the board is left as it
    /// was.
    pub fn replace_from(&mut self, snapshot: &BoardSnapshot) -> GameResult<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    pub fn from_snapshot(snapshot: &BoardSnapshot) -> GameResult<Self> {
        let mut board = Self::new();
        for (y, row) in snapshot.0.iter().enumerate() {
            for (x, value) in row.iter().enumerate() {
                board.cells[y * BOARD_SIZE + x] = piece::decode(*value)?;
            }
        }
        Ok(board)
    }

    /// Encode back into the wire grid
    pub fn to_snapshot(&self) -> BoardSnapshot {
        let mut grid = [[piece::EMPTY; BOARD_SIZE]; BOARD_SIZE];
        for (index, cell) in self.cells.iter().enumerate() {
            grid[index / BOARD_SIZE][index % BOARD_SIZE] = piece::encode_cell(*cell);
        }
        BoardSnapshot(grid)
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Row `y` from file a to file h
    pub fn row(&self, y: u8) -> GameResult<[Option<Piece>; BOARD_SIZE]> {
        let start = Self::index(0, y)?;
        let mut row = [None; BOARD_SIZE];
        row.copy_from_slice(&self.cells[start..start + BOARD_SIZE]);
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawn(color: PieceColor) -> Piece {
        Piece::new(PieceKind::Pawn, color)
    }

    #[test]
    fn test_accessors_succeed_on_every_square() {
        let mut board = BoardState::new();
        for y in 0..8 {
            for x in 0..8 {
                board.set(pawn(PieceColor::White), x, y).expect("in bounds");
                assert_eq!(board.get(x, y), Ok(Some(pawn(PieceColor::White))));
                board.clear(x, y).expect("in bounds");
                assert_eq!(board.get(x, y), Ok(None));
            }
        }
    }

    #[test]
    fn test_accessors_reject_out_of_range() {
        let mut board = BoardState::standard();
        let before = board.clone();

        for (x, y) in [(8, 0), (0, 8), (8, 8), (255, 3)] {
            assert_eq!(board.get(x, y), Err(GameError::OutOfBounds { x, y }));
            assert_eq!(
                board.set(pawn(PieceColor::Black), x, y),
                Err(GameError::OutOfBounds { x, y })
            );
            assert_eq!(board.clear(x, y), Err(GameError::OutOfBounds { x, y }));
        }

        assert_eq!(board, before, "failed writes must not touch the board");
    }

    #[test]
    fn test_standard_position() {
        let board = BoardState::standard();
        let back: Vec<_> = BACK_ROW.to_vec();

        let row0: Vec<_> = board.row(0).unwrap().iter().map(|p| p.unwrap()).collect();
        assert!(row0.iter().all(|p| p.color == PieceColor::Black));
        assert_eq!(row0.iter().map(|p| p.kind).collect::<Vec<_>>(), back);

        let row7: Vec<_> = board.row(7).unwrap().iter().map(|p| p.unwrap()).collect();
        assert!(row7.iter().all(|p| p.color == PieceColor::White));
        assert_eq!(row7.iter().map(|p| p.kind).collect::<Vec<_>>(), back);

        assert!(board.row(1).unwrap().iter().all(|p| *p == Some(pawn(PieceColor::Black))));
        assert!(board.row(6).unwrap().iter().all(|p| *p == Some(pawn(PieceColor::White))));

        for y in 2..6 {
            assert!(board.row(y).unwrap().iter().all(Option::is_none), "row {y} should be empty");
        }
        assert_eq!(board.piece_count(), 32);
    }

    #[test]
    fn test_initialize_standard_wipes_previous_contents() {
        let mut board = BoardState::new();
        board.set(pawn(PieceColor::White), 3, 3).unwrap();
        board.initialize_standard();
        assert_eq!(board, BoardState::standard());
    }

    #[test]
    fn test_replace_from_discards_existing_cells() {
        let mut board = BoardState::standard();
        let mut grid = [[0; 8]; 8];
        grid[4][4] = piece::encode(PieceKind::Queen, PieceColor::Black);

        board.replace_from(&BoardSnapshot(grid)).expect("valid snapshot");

        assert_eq!(board.piece_count(), 1);
        assert_eq!(
            board.get(4, 4),
            Ok(Some(Piece::new(PieceKind::Queen, PieceColor::Black)))
        );
    }

    #[test]
    fn test_replace_from_is_all_or_nothing() {
        let mut board = BoardState::standard();
        let mut grid = BoardState::standard().to_snapshot().0;
        grid[3][3] = 7;

        let result = board.replace_from(&BoardSnapshot(grid));

        assert!(matches!(result, Err(GameError::Codec(_))));
        assert_eq!(board, BoardState::standard());
    }

    #[test]
    fn test_snapshot_is_row_major() {
        let snapshot = BoardState::standard().to_snapshot();
        assert_eq!(snapshot.cell(4, 0), piece::encode(PieceKind::King, PieceColor::Black));
        assert_eq!(snapshot.cell(4, 6), piece::encode(PieceKind::Pawn, PieceColor::White));
        assert_eq!(
            BoardState::from_snapshot(&snapshot).unwrap(),
            BoardState::standard()
        );
    }
}
