//! One-shot position analysis for the `best-move` command.

use anyhow::{Context, Result};
use noughts_core::{Board, Mark, MoveSelector, ScoringPolicy};
use serde::Serialize;
use tracing::{info, instrument};

/// The selector's verdict on one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// The analysed board.
    pub board: Board,
    /// Mark to move.
    pub to_move: Mark,
    /// Mark the search maximizes for.
    pub computer: Mark,
    /// Scoring policy used.
    pub policy: ScoringPolicy,
    /// Chosen cell (0-8).
    pub cell: usize,
    /// Minimax score of the chosen cell.
    pub score: i32,
}

impl std::fmt::Display for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f)?;
        write!(
            f,
            "Best move for {}: cell {} (index {}), score {} for {}",
            self.to_move,
            self.cell + 1,
            self.cell,
            self.score,
            self.computer
        )
    }
}

/// Parses `board` and runs the selector on it.
#[instrument]
pub fn analyze(
    board: &str,
    to_move: Mark,
    computer: Mark,
    policy: ScoringPolicy,
) -> Result<Analysis> {
    let board: Board = board
        .parse()
        .with_context(|| format!("Invalid board {:?}", board))?;

    let chosen = MoveSelector::with_policy(computer, policy)
        .best_move(board, to_move)
        .context("No move to choose")?;

    info!(cell = chosen.cell, score = chosen.score, "Analysis complete");
    Ok(Analysis {
        board,
        to_move,
        computer,
        policy,
        cell: chosen.cell,
        score: chosen.score,
    })
}
