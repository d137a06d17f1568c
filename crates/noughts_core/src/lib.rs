//! Noughts core - tic-tac-toe rules, game state machine and an optimal opponent.
//!
//! # Architecture
//!
//! - **Session**: [`GameSession`] owns the board, turn, status and move log
//! - **Selector**: [`MoveSelector`] runs full-depth minimax for the computer
//! - **Rules**: pure win/draw checks shared by both
//!
//! Rendering and input belong to the caller; the core only consumes cell
//! indices and reports the resulting state.
//!
//! # Example
//!
//! ```
//! use noughts_core::{GameSession, GameStatus, Mode};
//!
//! let mut session = GameSession::new(Mode::vs_computer());
//! session.submit_move(0)?;
//! let reply = session.computer_move()?;
//! assert_eq!(reply.chosen.cell, 4);
//! assert_eq!(session.status(), GameStatus::InProgress);
//! # Ok::<(), noughts_core::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod rules;
mod selector;
mod session;
mod types;

pub use error::{BoardParseError, GameError, IllegalSelectorInvocation, InvalidMove, SnapshotError};
pub use rules::{WINNING_LINES, WinningLine};
pub use selector::{DRAW_SCORE, LOSS_SCORE, MoveSelector, ScoredMove, ScoringPolicy, WIN_SCORE};
pub use session::{ComputerMove, GameSession};
pub use types::{Board, CELL_COUNT, GameStatus, Mark, Mode, MoveLogEntry, Square};
