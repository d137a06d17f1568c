//! Game session state machine.
//!
//! A [`GameSession`] owns the board, the turn and the move log for one game.
//! It is `InProgress` until a move completes a line (`Won`) or fills the
//! board (`Draw`); both are terminal until [`GameSession::reset`].

use crate::error::{GameError, InvalidMove, SnapshotError};
use crate::rules::{is_full, winning_line};
use crate::selector::{MoveSelector, ScoredMove, ScoringPolicy};
use crate::types::{Board, CELL_COUNT, GameStatus, Mark, MoveLogEntry, Mode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Result of a computer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerMove {
    /// The selector's choice.
    pub chosen: ScoredMove,
    /// Status after the move was applied.
    pub status: GameStatus,
}

/// One game of tic-tac-toe.
///
/// Every operation either fully applies or leaves the session untouched.
/// A deserialized session is rebuilt by replaying its move log, and is
/// rejected unless the stored board, turn and status match the replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionSnapshot")]
pub struct GameSession {
    mode: Mode,
    policy: ScoringPolicy,
    board: Board,
    turn: Mark,
    status: GameStatus,
    log: Vec<MoveLogEntry>,
}

impl GameSession {
    /// Starts a new game with flat minimax scoring.
    #[instrument]
    pub fn new(mode: Mode) -> Self {
        Self::with_policy(mode, ScoringPolicy::Flat)
    }

    /// Starts a new game whose computer opponent uses `policy`.
    #[instrument]
    pub fn with_policy(mode: Mode, policy: ScoringPolicy) -> Self {
        info!(%mode, %policy, "Starting new game");
        Self {
            mode,
            policy,
            board: Board::new(),
            turn: Mark::X,
            status: GameStatus::InProgress,
            log: Vec::new(),
        }
    }

    /// The game mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The computer's scoring policy.
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The mark to move (the last mover once the game is over).
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// The current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Accepted moves, oldest first.
    pub fn move_log(&self) -> &[MoveLogEntry] {
        &self.log
    }

    /// The most recent accepted move.
    pub fn last_move(&self) -> Option<&MoveLogEntry> {
        self.log.last()
    }

    /// The human's mark in a human-vs-computer game.
    pub fn human_mark(&self) -> Option<Mark> {
        self.mode.computer().map(Mark::opponent)
    }

    /// True while the game is live and the computer holds the turn.
    pub fn is_computer_turn(&self) -> bool {
        !self.status.is_terminal() && self.mode.is_computer(self.turn)
    }

    /// Places the current mark on `cell`.
    ///
    /// In human-vs-computer mode only the human's mark can be submitted.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if the game is over, it is the computer's turn,
    /// the cell is out of range, or the cell is occupied. The session is
    /// unchanged in every error case.
    #[instrument(skip(self), fields(mode = %self.mode, turn = %self.turn))]
    pub fn submit_move(&mut self, cell: usize) -> Result<GameStatus, InvalidMove> {
        if self.status.is_terminal() {
            warn!("Move rejected: game is over");
            return Err(InvalidMove::GameOver);
        }

        if self.mode.is_computer(self.turn) {
            warn!("Move rejected: computer's turn");
            return Err(InvalidMove::NotYourTurn(self.turn.opponent()));
        }

        self.check_cell(cell)?;
        Ok(self.place(cell))
    }

    /// Lets the computer opponent choose and play its move.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove::NoComputerOpponent`] in human-vs-human mode,
    /// [`InvalidMove::GameOver`] on a finished game and
    /// [`InvalidMove::NotYourTurn`] when the human holds the turn.
    #[instrument(skip(self), fields(mode = %self.mode, turn = %self.turn))]
    pub fn computer_move(&mut self) -> Result<ComputerMove, GameError> {
        let Some(computer) = self.mode.computer() else {
            warn!("Computer move requested without a computer opponent");
            return Err(InvalidMove::NoComputerOpponent.into());
        };

        if self.status.is_terminal() {
            warn!("Computer move rejected: game is over");
            return Err(InvalidMove::GameOver.into());
        }

        if self.turn != computer {
            warn!("Computer move rejected: human's turn");
            return Err(InvalidMove::NotYourTurn(computer).into());
        }

        let chosen = MoveSelector::with_policy(computer, self.policy).best_move(self.board, computer)?;
        self.check_cell(chosen.cell)?;
        let status = self.place(chosen.cell);

        Ok(ComputerMove { chosen, status })
    }

    /// Starts over with a fresh board in `mode`.
    #[instrument(skip(self))]
    pub fn reset(&mut self, mode: Mode) {
        *self = Self::with_policy(mode, self.policy);
    }

    /// Starts over in the current mode.
    pub fn restart(&mut self) {
        self.reset(self.mode);
    }

    fn check_cell(&self, cell: usize) -> Result<(), InvalidMove> {
        if cell >= CELL_COUNT {
            warn!(cell, "Move rejected: out of range");
            return Err(InvalidMove::OutOfRange(cell));
        }

        if !self.board.is_empty(cell) {
            warn!(cell, "Move rejected: cell occupied");
            return Err(InvalidMove::CellOccupied(cell));
        }

        Ok(())
    }

    /// Writes the mark, logs the move and advances the state machine.
    ///
    /// Callers must have validated `cell`.
    fn place(&mut self, cell: usize) -> GameStatus {
        let mark = self.turn;
        self.board.place(cell, mark);

        let entry = MoveLogEntry::new(self.log.len() + 1, mark, cell);
        info!(%entry, "Move accepted");
        self.log.push(entry);

        if let Some(line) = winning_line(&self.board, mark) {
            self.status = GameStatus::Won { mark, line };
            info!(%mark, %line, "Game won");
        } else if is_full(&self.board) {
            self.status = GameStatus::Draw;
            info!("Game drawn");
        } else {
            self.turn = mark.opponent();
        }

        debug_assert_eq!(self.log.len() + self.board.empty_count(), CELL_COUNT);
        self.status
    }
}

/// Wire form of a [`GameSession`], validated on the way in.
#[derive(Deserialize)]
struct SessionSnapshot {
    mode: Mode,
    policy: ScoringPolicy,
    board: Board,
    turn: Mark,
    status: GameStatus,
    log: Vec<MoveLogEntry>,
}

impl TryFrom<SessionSnapshot> for GameSession {
    type Error = SnapshotError;

    #[instrument(skip(snapshot), fields(moves = snapshot.log.len()))]
    fn try_from(snapshot: SessionSnapshot) -> Result<Self, Self::Error> {
        let mut session = Self::with_policy(snapshot.mode, snapshot.policy);

        for entry in &snapshot.log {
            let sequence = *entry.sequence();
            if session.status.is_terminal() {
                return Err(SnapshotError::IllegalLogEntry(sequence, InvalidMove::GameOver));
            }
            if sequence != session.log.len() + 1 || *entry.mark() != session.turn {
                return Err(SnapshotError::LogOutOfOrder(sequence));
            }
            session
                .check_cell(*entry.cell())
                .map_err(|e| SnapshotError::IllegalLogEntry(sequence, e))?;
            session.place(*entry.cell());
        }

        if session.board != snapshot.board
            || session.turn != snapshot.turn
            || session.status != snapshot.status
        {
            warn!("Snapshot state disagrees with its move log");
            return Err(SnapshotError::StateMismatch);
        }

        Ok(session)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::WINNING_LINES;

    fn play(session: &mut GameSession, cells: &[usize]) -> GameStatus {
        let mut status = session.status();
        for &cell in cells {
            status = session.submit_move(cell).expect("legal move");
        }
        status
    }

    #[test]
    fn test_turn_alternates() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        assert_eq!(session.turn(), Mark::X);
        session.submit_move(4).unwrap();
        assert_eq!(session.turn(), Mark::O);
        session.submit_move(0).unwrap();
        assert_eq!(session.turn(), Mark::X);
    }

    #[test]
    fn test_log_records_moves() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        play(&mut session, &[4, 0]);
        assert_eq!(
            session.move_log(),
            &[MoveLogEntry::new(1, Mark::X, 4), MoveLogEntry::new(2, Mark::O, 0)]
        );
        assert_eq!(session.last_move(), Some(&MoveLogEntry::new(2, Mark::O, 0)));
    }

    #[test]
    fn test_occupied_cell_is_noop() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        session.submit_move(4).unwrap();
        let before = session.clone();
        assert_eq!(session.submit_move(4), Err(InvalidMove::CellOccupied(4)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        let before = session.clone();
        assert_eq!(session.submit_move(9), Err(InvalidMove::OutOfRange(9)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_win_sets_first_line() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        let status = play(&mut session, &[0, 3, 1, 4, 2]);
        assert_eq!(
            status,
            GameStatus::Won {
                mark: Mark::X,
                line: WINNING_LINES[0]
            }
        );
        assert_eq!(session.turn(), Mark::X);
    }

    #[test]
    fn test_terminal_game_rejects_moves() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        play(&mut session, &[0, 3, 1, 4, 2]);
        let before = session.clone();
        assert_eq!(session.submit_move(8), Err(InvalidMove::GameOver));
        assert_eq!(session, before);
    }

    #[test]
    fn test_human_cannot_move_for_computer() {
        let mut session = GameSession::new(Mode::vs_computer());
        session.submit_move(0).unwrap();
        assert!(session.is_computer_turn());

        let before = session.clone();
        assert_eq!(session.submit_move(4), Err(InvalidMove::NotYourTurn(Mark::X)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_computer_move_answers_human() {
        let mut session = GameSession::new(Mode::vs_computer());
        session.submit_move(0).unwrap();

        let reply = session.computer_move().unwrap();
        assert_eq!(reply.status, GameStatus::InProgress);
        assert_eq!(session.move_log().len(), 2);
        assert_eq!(*session.move_log()[1].mark(), Mark::O);
        assert_eq!(*session.move_log()[1].cell(), reply.chosen.cell);
        assert_eq!(session.turn(), Mark::X);
        // The only non-losing reply to a corner opening is the center.
        assert_eq!(reply.chosen.cell, 4);
    }

    #[test]
    fn test_computer_move_rejected_on_human_turn() {
        let mut session = GameSession::new(Mode::vs_computer());
        let before = session.clone();
        assert_eq!(
            session.computer_move(),
            Err(GameError::Move(InvalidMove::NotYourTurn(Mark::O)))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_computer_move_rejected_after_game_over() {
        let mut session = GameSession::new(Mode::vs_computer());
        while !session.status().is_terminal() {
            if session.is_computer_turn() {
                session.computer_move().unwrap();
            } else {
                let cell = session.board().empty_cells().next().unwrap();
                session.submit_move(cell).unwrap();
            }
        }
        assert!(matches!(
            session.status(),
            GameStatus::Won { mark: Mark::O, .. } | GameStatus::Draw
        ));

        let before = session.clone();
        assert_eq!(
            session.computer_move(),
            Err(GameError::Move(InvalidMove::GameOver))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_computer_move_rejected_after_draw() {
        let mut session = GameSession::new(Mode::HumanVsComputer { computer: Mark::X });
        while !session.status().is_terminal() {
            if session.is_computer_turn() {
                session.computer_move().unwrap();
            } else {
                let reply = MoveSelector::new(Mark::O).best_move(*session.board(), Mark::O).unwrap();
                session.submit_move(reply.cell).unwrap();
            }
        }
        assert_eq!(session.status(), GameStatus::Draw);

        let before = session.clone();
        assert_eq!(
            session.computer_move(),
            Err(GameError::Move(InvalidMove::GameOver))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_computer_move_rejected_without_computer() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        assert_eq!(
            session.computer_move(),
            Err(GameError::Move(InvalidMove::NoComputerOpponent))
        );
    }

    #[test]
    fn test_computer_can_open() {
        let mut session = GameSession::new(Mode::HumanVsComputer { computer: Mark::X });
        assert!(session.is_computer_turn());
        assert_eq!(session.submit_move(4), Err(InvalidMove::NotYourTurn(Mark::O)));

        let reply = session.computer_move().unwrap();
        assert_eq!(reply.chosen.score, 0);
        assert_eq!(session.turn(), Mark::O);
        assert_eq!(session.human_mark(), Some(Mark::O));
    }

    #[test]
    fn test_reset_from_terminal() {
        let mut session = GameSession::new(Mode::HumanVsHuman);
        play(&mut session, &[0, 3, 1, 4, 2]);

        session.reset(Mode::vs_computer());
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.status(), GameStatus::InProgress);
        assert!(session.move_log().is_empty());
        assert_eq!(session.turn(), Mark::X);
        assert_eq!(session.mode(), Mode::vs_computer());
    }

    #[test]
    fn test_restart_keeps_mode_and_policy() {
        let mut session = GameSession::with_policy(Mode::vs_computer(), ScoringPolicy::PreferFaster);
        session.submit_move(0).unwrap();
        session.restart();
        assert_eq!(
            session,
            GameSession::with_policy(Mode::vs_computer(), ScoringPolicy::PreferFaster)
        );
    }
}
