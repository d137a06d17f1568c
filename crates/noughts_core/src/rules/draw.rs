//! Draw detection logic for tic-tac-toe.

use super::win::has_won;
use crate::types::{Board, Mark};

/// Checks if the board is full (all squares occupied).
pub fn is_full(board: &Board) -> bool {
    board.empty_count() == 0
}

/// A full board with no winner.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && !has_won(board, Mark::X) && !has_won(board, Mark::O)
}
