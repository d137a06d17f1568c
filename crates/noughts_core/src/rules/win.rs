//! Win detection logic for tic-tac-toe.

use crate::error::SnapshotError;
use crate::types::{Board, Mark, Square};
use serde::{Deserialize, Serialize};

/// One of the eight index triples that wins the game.
///
/// Deserialization only accepts members of [`WINNING_LINES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 3]")]
pub struct WinningLine([usize; 3]);

impl WinningLine {
    /// The three cells of this line.
    pub fn cells(&self) -> [usize; 3] {
        self.0
    }

    /// Whether `cell` lies on this line.
    pub fn contains(&self, cell: usize) -> bool {
        self.0.contains(&cell)
    }

    /// Whether all three cells hold `mark`.
    pub fn is_complete(&self, board: &Board, mark: Mark) -> bool {
        self.0
            .iter()
            .all(|&cell| board.get(cell) == Some(Square::Occupied(mark)))
    }
}

impl TryFrom<[usize; 3]> for WinningLine {
    type Error = SnapshotError;

    fn try_from(cells: [usize; 3]) -> Result<Self, Self::Error> {
        WINNING_LINES
            .iter()
            .copied()
            .find(|line| line.0 == cells)
            .ok_or(SnapshotError::UnknownLine(cells))
    }
}

impl std::fmt::Display for WinningLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a},{b},{c}]")
    }
}

/// The winning lines, in scan order: rows, columns, then both diagonals.
pub const WINNING_LINES: [WinningLine; 8] = [
    // Rows
    WinningLine([0, 1, 2]),
    WinningLine([3, 4, 5]),
    WinningLine([6, 7, 8]),
    // Columns
    WinningLine([0, 3, 6]),
    WinningLine([1, 4, 7]),
    WinningLine([2, 5, 8]),
    // Diagonals
    WinningLine([0, 4, 8]),
    WinningLine([2, 4, 6]),
];

/// Returns the first line completed by `mark`, scanning [`WINNING_LINES`] in order.
pub fn winning_line(board: &Board, mark: Mark) -> Option<WinningLine> {
    WINNING_LINES
        .iter()
        .copied()
        .find(|line| line.is_complete(board, mark))
}

/// Checks whether `mark` has three in a row.
pub fn has_won(board: &Board, mark: Mark) -> bool {
    winning_line(board, mark).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(winning_line(&board, Mark::X), None);
        assert_eq!(winning_line(&board, Mark::O), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board: Board = "XXX|OO.|...".parse().unwrap();
        assert_eq!(winning_line(&board, Mark::X), Some(WINNING_LINES[0]));
        assert!(!has_won(&board, Mark::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board: Board = "XXO|.O.|OX.".parse().unwrap();
        assert_eq!(
            winning_line(&board, Mark::O).map(|line| line.cells()),
            Some([2, 4, 6])
        );
    }

    #[test]
    fn test_first_line_in_scan_order_is_reported() {
        // X completes both the top row and the left column.
        let board: Board = "XXX|XO.|XOO".parse().unwrap();
        assert_eq!(
            winning_line(&board, Mark::X).map(|line| line.cells()),
            Some([0, 1, 2])
        );
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board: Board = "XX.|...|...".parse().unwrap();
        assert!(!has_won(&board, Mark::X));
    }

    #[test]
    fn test_line_display() {
        assert_eq!(WINNING_LINES[7].to_string(), "[2,4,6]");
        assert!(WINNING_LINES[6].contains(8));
    }

    #[test]
    fn test_line_deserializes_from_known_cells() {
        let line: WinningLine = serde_json::from_str("[0,4,8]").unwrap();
        assert_eq!(line, WINNING_LINES[6]);
        assert_eq!(serde_json::to_string(&line).unwrap(), "[0,4,8]");
    }

    #[test]
    fn test_line_rejects_unknown_cells() {
        assert!(serde_json::from_str::<WinningLine>("[7,7,99]").is_err());
        assert!(serde_json::from_str::<WinningLine>("[8,4,0]").is_err());
        assert_eq!(
            WinningLine::try_from([0, 1, 3]),
            Err(SnapshotError::UnknownLine([0, 1, 3]))
        );
    }
}
