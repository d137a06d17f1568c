//! Error types for the game core.

use crate::types::Mark;

/// A move that was rejected. The session is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum InvalidMove {
    /// Cell index outside 0-8.
    #[display("Cell {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(usize),

    /// The game is already won or drawn.
    #[display("Game is already over")]
    GameOver,

    /// The mark that tried to move does not hold the turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Mark),

    /// A computer move was requested in a human-vs-human game.
    #[display("There is no computer opponent in this game")]
    NoComputerOpponent,
}

impl std::error::Error for InvalidMove {}

/// The move selector was asked to search a finished board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IllegalSelectorInvocation {
    /// The board is already won or has no empty cells.
    #[display("Move selector invoked on a terminal board")]
    TerminalBoard,
}

impl std::error::Error for IllegalSelectorInvocation {}

/// Any failure of a session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum GameError {
    /// Rejected move.
    #[display("Invalid move: {}", _0)]
    Move(InvalidMove),

    /// Selector contract violation.
    #[display("Selector error: {}", _0)]
    Selector(IllegalSelectorInvocation),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Move(e) => Some(e),
            GameError::Selector(e) => Some(e),
        }
    }
}

/// A board string could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardParseError {
    /// Wrong number of cell symbols.
    #[display("Expected 9 cells, found {}", _0)]
    Length(usize),

    /// A character that is neither a mark nor an empty marker.
    #[display("Invalid cell symbol '{}'", _0)]
    InvalidSymbol(char),
}

impl std::error::Error for BoardParseError {}

/// A deserialized session or winning line that no legal game could produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SnapshotError {
    /// Cells that are not one of the eight winning lines.
    #[display("{:?} is not a winning line", _0)]
    UnknownLine([usize; 3]),

    /// A log entry that cannot be replayed from the entries before it.
    #[display("Move {} cannot be replayed: {}", _0, _1)]
    IllegalLogEntry(usize, InvalidMove),

    /// Log entries out of sequence or played by the wrong mark.
    #[display("Move {} is out of order", _0)]
    LogOutOfOrder(usize),

    /// Board, turn or status disagree with the replayed move log.
    #[display("Session state does not match its move log")]
    StateMismatch,
}

impl std::error::Error for SnapshotError {}
