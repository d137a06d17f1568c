//! Minimax move selection.
//!
//! Full-depth search with no pruning. Scores are taken from the computer's
//! point of view: a computer win is positive, a human win negative, a draw
//! zero. Boards are passed by value, so every branch explores its own copy.

use crate::error::IllegalSelectorInvocation;
use crate::rules::{has_won, is_full};
use crate::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Score of a board the computer has won.
pub const WIN_SCORE: i32 = 10;

/// Score of a board the human has won.
pub const LOSS_SCORE: i32 = -10;

/// Score of a full board with no winner.
pub const DRAW_SCORE: i32 = 0;

/// How terminal boards are scored.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoringPolicy {
    /// Wins are always +10 and losses -10, however deep they occur.
    ///
    /// The selector never loses but has no preference between a quick and a
    /// slow win.
    #[default]
    Flat,
    /// Wins score `10 - depth` and losses `depth - 10`: the fastest win and
    /// the slowest loss are preferred.
    PreferFaster,
}

/// A candidate move with its minimax score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredMove {
    /// Cell index (0-8).
    pub cell: usize,
    /// Minimax score from the computer's point of view.
    pub score: i32,
}

/// Optimal move selector for one computer mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSelector {
    computer: Mark,
    policy: ScoringPolicy,
}

impl MoveSelector {
    /// Selector for `computer` with flat scoring.
    pub fn new(computer: Mark) -> Self {
        Self::with_policy(computer, ScoringPolicy::Flat)
    }

    /// Selector for `computer` with an explicit scoring policy.
    pub fn with_policy(computer: Mark, policy: ScoringPolicy) -> Self {
        Self { computer, policy }
    }

    /// The maximizing mark.
    pub fn computer(&self) -> Mark {
        self.computer
    }

    /// The minimizing mark.
    pub fn human(&self) -> Mark {
        self.computer.opponent()
    }

    /// The scoring policy in use.
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Returns the optimal cell for `to_move` on `board`.
    ///
    /// When `to_move` is the computer the highest-scoring cell is chosen,
    /// otherwise the lowest. Ties go to the lowest cell index.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalSelectorInvocation::TerminalBoard`] if either mark has
    /// already won or the board is full.
    #[instrument(skip(self, board), fields(computer = %self.computer, policy = %self.policy))]
    pub fn best_move(
        &self,
        board: Board,
        to_move: Mark,
    ) -> Result<ScoredMove, IllegalSelectorInvocation> {
        if self.terminal_score(&board, 0).is_some() {
            warn!("Refusing to search a terminal board");
            return Err(IllegalSelectorInvocation::TerminalBoard);
        }

        let mut nodes = 0u64;
        let chosen = self
            .choose(board, to_move, 0, &mut nodes)
            .ok_or(IllegalSelectorInvocation::TerminalBoard)?;

        debug!(cell = chosen.cell, score = chosen.score, nodes, "Selected move");
        Ok(chosen)
    }

    /// Scores a terminal board; `None` while play can continue.
    ///
    /// Checked in order: human win, computer win, full board.
    fn terminal_score(&self, board: &Board, depth: i32) -> Option<i32> {
        if has_won(board, self.human()) {
            Some(self.loss_score(depth))
        } else if has_won(board, self.computer) {
            Some(self.win_score(depth))
        } else if is_full(board) {
            Some(DRAW_SCORE)
        } else {
            None
        }
    }

    fn evaluate(&self, board: Board, to_move: Mark, depth: i32, nodes: &mut u64) -> i32 {
        *nodes += 1;
        match self.terminal_score(&board, depth) {
            Some(score) => score,
            None => self
                .choose(board, to_move, depth, nodes)
                .map_or(DRAW_SCORE, |chosen| chosen.score),
        }
    }

    fn choose(&self, board: Board, to_move: Mark, depth: i32, nodes: &mut u64) -> Option<ScoredMove> {
        let maximizing = to_move == self.computer;
        let mut best: Option<ScoredMove> = None;

        for cell in board.empty_cells() {
            let score = self.evaluate(
                board.with_mark(cell, to_move),
                to_move.opponent(),
                depth + 1,
                nodes,
            );
            let candidate = ScoredMove { cell, score };

            best = match best {
                None => Some(candidate),
                Some(current) if maximizing && score > current.score => Some(candidate),
                Some(current) if !maximizing && score < current.score => Some(candidate),
                kept => kept,
            };
        }

        best
    }

    fn win_score(&self, depth: i32) -> i32 {
        match self.policy {
            ScoringPolicy::Flat => WIN_SCORE,
            ScoringPolicy::PreferFaster => WIN_SCORE - depth,
        }
    }

    fn loss_score(&self, depth: i32) -> i32 {
        match self.policy {
            ScoringPolicy::Flat => LOSS_SCORE,
            ScoringPolicy::PreferFaster => LOSS_SCORE + depth,
        }
    }
}
