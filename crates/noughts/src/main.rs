//! Noughts - terminal tic-tac-toe
//!
//! Play against a friend or an opponent that never loses, or ask the
//! selector for the best move in any position.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod analyze;
mod cli;
mod config;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use config::GameConfig;
use noughts_core::ScoringPolicy;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            mode,
            computer_first,
            config,
        } => run_play(&config, mode, computer_first),
        Command::BestMove {
            board,
            to_move,
            computer,
            prefer_faster,
            json,
        } => run_best_move(
            &board,
            to_move.into(),
            computer.map(Into::into),
            prefer_faster,
            json,
        ),
    }
}

/// Run the terminal game, logging to a file so the screen stays clean.
fn run_play(
    config_path: &std::path::Path,
    mode: Option<config::ModeSetting>,
    computer_first: bool,
) -> Result<()> {
    let config = GameConfig::load_or_default(config_path)?.with_overrides(mode, computer_first);

    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("Failed to create log file {}", config.log_file().display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(mode = %config.mode(), scoring = %config.scoring(), "Configuration ready");
    tui::run_tui(&config)
}

/// Print the selector's choice for one position.
fn run_best_move(
    board: &str,
    to_move: noughts_core::Mark,
    computer: Option<noughts_core::Mark>,
    prefer_faster: bool,
    json: bool,
) -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let policy = if prefer_faster {
        ScoringPolicy::PreferFaster
    } else {
        ScoringPolicy::Flat
    };

    let analysis = analyze::analyze(board, to_move, computer.unwrap_or(to_move), policy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", analysis);
    }
    Ok(())
}
