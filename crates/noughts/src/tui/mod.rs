//! Terminal UI for noughts.

mod app;
mod input;
mod ui;

use crate::config::GameConfig;
use anyhow::Result;
use app::{App, Flow};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout, Write};
use std::time::Instant;
use tracing::{error, info, instrument};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Runs the interactive game until the player quits.
#[instrument(skip(config))]
pub fn run_tui(config: &GameConfig) -> Result<()> {
    info!("Starting noughts TUI");

    enable_raw_mode()?;
    let mut terminal = match enter_screen() {
        Ok(terminal) => terminal,
        Err(err) => {
            error!(error = ?err, "Terminal setup failed");
            abandon_setup(&mut io::stdout());
            return Err(err);
        }
    };

    let mut app = App::new(
        config.mode(),
        *config.scoring(),
        config.thinking_delay(),
        Instant::now(),
    );
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("Leaving noughts TUI");
    res
}

fn enter_screen() -> Result<Tui> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Undoes a partial setup. Failures are logged; the setup error is the one reported.
fn abandon_setup(out: &mut impl Write) {
    if let Err(err) = execute!(out, LeaveAlternateScreen) {
        error!(error = ?err, "Failed to leave alternate screen");
    }
    if let Err(err) = disable_raw_mode() {
        error!(error = ?err, "Failed to disable raw mode");
    }
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if app.tick(Instant::now()) {
            continue;
        }

        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code, Instant::now()) == Flow::Quit
        {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abandon_setup_leaves_alternate_screen() {
        let mut out = Vec::new();
        abandon_setup(&mut out);
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049l"));
    }
}
