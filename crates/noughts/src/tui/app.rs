//! Application state and logic.

use super::input::{digit_cell, move_cursor};
use crossterm::event::KeyCode;
use noughts_core::{GameSession, GameStatus, Mark, Mode, ScoringPolicy};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the UI.
    Quit,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    session: GameSession,
    cursor: usize,
    status_message: String,
    computer_seat: Mark,
    thinking_delay: Duration,
    pending_computer: Option<Instant>,
}

impl App {
    /// Creates a new application and schedules the computer if it opens.
    #[instrument]
    pub fn new(mode: Mode, policy: ScoringPolicy, thinking_delay: Duration, now: Instant) -> Self {
        let mut app = Self {
            session: GameSession::with_policy(mode, policy),
            cursor: 4,
            status_message: String::new(),
            computer_seat: mode.computer().unwrap_or(Mark::O),
            thinking_delay,
            pending_computer: None,
        };
        app.schedule_computer(now);
        app.refresh_status();
        app
    }

    /// The game being played.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Highlighted cell.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text for the status line.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// True while the computer's reply is pending.
    pub fn is_thinking(&self) -> bool {
        self.pending_computer.is_some()
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        const IDLE: Duration = Duration::from_millis(100);
        match self.pending_computer {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE),
            None => IDLE,
        }
    }

    /// Handles a key press.
    #[instrument(skip(self))]
    pub fn handle_key(&mut self, key: KeyCode, now: Instant) -> Flow {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('r') => self.restart(now),
            KeyCode::Char('m') => self.toggle_mode(now),
            KeyCode::Char(' ') | KeyCode::Enter => self.submit(self.cursor, now),
            KeyCode::Char(c) => {
                if let Some(cell) = digit_cell(c) {
                    self.cursor = cell;
                    self.submit(cell, now);
                }
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                self.cursor = move_cursor(self.cursor, key);
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Plays the deferred computer move once its deadline has passed.
    ///
    /// Returns true if a move was played.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_computer {
            Some(deadline) if deadline <= now => {}
            _ => return false,
        }
        self.pending_computer = None;

        match self.session.computer_move() {
            Ok(reply) => {
                debug!(cell = reply.chosen.cell, score = reply.chosen.score, "Computer moved");
                self.cursor = reply.chosen.cell;
                self.refresh_status();
                true
            }
            Err(e) => {
                error!(error = %e, "Computer move failed");
                self.status_message = format!("Computer move failed: {}", e);
                false
            }
        }
    }

    fn submit(&mut self, cell: usize, now: Instant) {
        match self.session.submit_move(cell) {
            Ok(_) => {
                self.schedule_computer(now);
                self.refresh_status();
            }
            Err(e) => {
                self.status_message = format!("Invalid move: {}. Try again.", e);
            }
        }
    }

    /// Restarts the game in the current mode.
    pub fn restart(&mut self, now: Instant) {
        info!("Restarting game");
        self.session.restart();
        self.begin(now);
    }

    /// Switches between PVP and PVE and starts a new game.
    pub fn toggle_mode(&mut self, now: Instant) {
        let mode = match self.session.mode() {
            Mode::HumanVsHuman => Mode::HumanVsComputer {
                computer: self.computer_seat,
            },
            Mode::HumanVsComputer { .. } => Mode::HumanVsHuman,
        };
        info!(%mode, "Switching mode");
        self.session.reset(mode);
        self.begin(now);
    }

    fn begin(&mut self, now: Instant) {
        self.cursor = 4;
        self.pending_computer = None;
        self.schedule_computer(now);
        self.refresh_status();
    }

    fn schedule_computer(&mut self, now: Instant) {
        if self.session.is_computer_turn() {
            self.pending_computer = Some(now + self.thinking_delay);
        }
    }

    fn refresh_status(&mut self) {
        self.status_message = match self.session.status() {
            GameStatus::InProgress if self.is_thinking() => "Computer is thinking...".to_string(),
            GameStatus::InProgress => format!(
                "Player {}'s turn ({})",
                self.session.turn(),
                self.session.mode()
            ),
            status @ (GameStatus::Won { .. } | GameStatus::Draw) => {
                format!("{} Press 'r' to restart or 'q' to quit.", status)
            }
        };
    }
}
