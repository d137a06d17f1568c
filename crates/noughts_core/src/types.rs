//! Core domain types for tic-tac-toe.

use crate::error::BoardParseError;
use crate::rules::WinningLine;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    fn symbol(self) -> Option<char> {
        match self {
            Square::Empty => None,
            Square::Occupied(Mark::X) => Some('X'),
            Square::Occupied(Mark::O) => Some('O'),
        }
    }
}

/// 3x3 board, squares in row-major order (0-8).
///
/// ```text
/// 0 | 1 | 2
/// ---------
/// 3 | 4 | 5
/// ---------
/// 6 | 7 | 8
/// ```
///
/// `Board` is `Copy`; hypothetical exploration always works on a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; CELL_COUNT],
        }
    }

    /// Gets the square at the given cell, `None` when out of range.
    pub fn get(&self, cell: usize) -> Option<Square> {
        self.squares.get(cell).copied()
    }

    /// Checks if a cell is in range and empty.
    pub fn is_empty(&self, cell: usize) -> bool {
        matches!(self.get(cell), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; CELL_COUNT] {
        &self.squares
    }

    /// Empty cells in increasing index order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, square)| **square == Square::Empty)
            .map(|(cell, _)| cell)
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.empty_cells().count()
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares
            .iter()
            .filter(|square| **square == Square::Occupied(mark))
            .count()
    }

    /// Returns a copy of this board with `mark` written into `cell`.
    ///
    /// Out-of-range cells leave the copy unchanged.
    pub fn with_mark(mut self, cell: usize, mark: Mark) -> Self {
        self.place(cell, mark);
        self
    }

    pub(crate) fn place(&mut self, cell: usize, mark: Mark) {
        debug_assert!(
            !matches!(self.get(cell), Some(Square::Occupied(_))),
            "placing onto occupied cell {cell}"
        );
        if let Some(square) = self.squares.get_mut(cell) {
            *square = Square::Occupied(mark);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the board with 1-based numbers in empty squares.
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let cell = row * 3 + col;
                match self.squares[cell].symbol() {
                    Some(symbol) => write!(f, "{symbol}")?,
                    None => write!(f, "{}", cell + 1)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Parses a compact board such as `"XO.|.X.|..O"`.
///
/// `X`/`O` (any case) are marks; `.`, `-` and `_` are empty. Whitespace and
/// `|` or `/` row separators are ignored.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|' && *c != '/')
            .collect();

        if symbols.len() != CELL_COUNT {
            return Err(BoardParseError::Length(symbols.len()));
        }

        let mut squares = [Square::Empty; CELL_COUNT];
        for (square, symbol) in squares.iter_mut().zip(symbols) {
            *square = match symbol {
                'X' | 'x' => Square::Occupied(Mark::X),
                'O' | 'o' => Square::Occupied(Mark::O),
                '.' | '-' | '_' => Square::Empty,
                other => return Err(BoardParseError::InvalidSymbol(other)),
            };
        }
        Ok(Self { squares })
    }
}

/// Game mode, fixed for the duration of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Mode {
    /// Two humans share the board.
    #[display("PVP")]
    HumanVsHuman,
    /// One human against the minimax opponent seated at `computer`.
    #[display("PVE")]
    HumanVsComputer {
        /// Mark played by the computer.
        computer: Mark,
    },
}

impl Mode {
    /// Human vs computer with the computer moving second.
    pub fn vs_computer() -> Self {
        Mode::HumanVsComputer { computer: Mark::O }
    }

    /// The computer's mark, if there is a computer opponent.
    pub fn computer(self) -> Option<Mark> {
        match self {
            Mode::HumanVsHuman => None,
            Mode::HumanVsComputer { computer } => Some(computer),
        }
    }

    /// Whether `mark` is played by the computer in this mode.
    pub fn is_computer(self, mark: Mark) -> bool {
        self.computer() == Some(mark)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::vs_computer()
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended with `mark` completing `line`.
    Won {
        /// The winning mark.
        mark: Mark,
        /// The completed line.
        line: WinningLine,
    },
    /// Board filled with no winner.
    Draw,
}

impl GameStatus {
    /// True once the game is won or drawn.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameStatus::Won { mark, .. } => Some(*mark),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }

    /// Returns the completed line if the game was won.
    pub fn winning_line(&self) -> Option<WinningLine> {
        match self {
            GameStatus::Won { line, .. } => Some(*line),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::Won { mark, .. } => write!(f, "Player {mark} wins!"),
            GameStatus::Draw => write!(f, "It's a draw!"),
        }
    }
}

/// One accepted move. Sequence numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct MoveLogEntry {
    /// Position of this move in the game (1-based).
    sequence: usize,
    /// Mark that was placed.
    mark: Mark,
    /// Cell index (0-8).
    cell: usize,
}

impl std::fmt::Display for MoveLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Move {}: {} to cell {}",
            self.sequence,
            self.mark,
            self.cell + 1
        )
    }
}
