//! Command-line interface for noughts.

use crate::config::ModeSetting;
use clap::{Parser, Subcommand, ValueEnum};
use noughts_core::Mark;

/// Noughts - tic-tac-toe against an opponent that never loses
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe with an optimal minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Opponent for the first game (overrides the config file)
        #[arg(long, value_enum)]
        mode: Option<ModeSetting>,

        /// Let the computer open the game as X
        #[arg(long)]
        computer_first: bool,

        /// Path to the configuration file
        #[arg(short, long, default_value = "noughts.toml")]
        config: std::path::PathBuf,
    },

    /// Print the optimal move for a position
    BestMove {
        /// Board as 9 symbols, row-major: X, O, and . for empty (e.g. "X..|.O.|...")
        #[arg(long)]
        board: String,

        /// Mark to move
        #[arg(long, value_enum)]
        to_move: MarkArg,

        /// Mark the search maximizes for (defaults to the mark to move)
        #[arg(long, value_enum)]
        computer: Option<MarkArg>,

        /// Prefer the fastest win and slowest loss
        #[arg(long)]
        prefer_faster: bool,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A mark as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkArg {
    /// X
    X,
    /// O
    O,
}

impl From<MarkArg> for Mark {
    fn from(arg: MarkArg) -> Self {
        match arg {
            MarkArg::X => Mark::X,
            MarkArg::O => Mark::O,
        }
    }
}
