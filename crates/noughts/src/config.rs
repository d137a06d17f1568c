//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use noughts_core::{Mark, Mode, ScoringPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Which kind of opponent a new game starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    /// Two humans at one keyboard.
    Pvp,
    /// Human against the computer.
    #[default]
    Pve,
}

impl ModeSetting {
    /// Builds the core mode, seating the computer first when asked.
    #[instrument]
    pub fn to_mode(self, computer_first: bool) -> Mode {
        match self {
            ModeSetting::Pvp => Mode::HumanVsHuman,
            ModeSetting::Pve => Mode::HumanVsComputer {
                computer: if computer_first { Mark::X } else { Mark::O },
            },
        }
    }
}

/// Settings for the terminal game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pause before the computer answers, in milliseconds.
    #[serde(default = "default_thinking_delay_ms")]
    thinking_delay_ms: u64,

    /// Mode of the first game.
    #[serde(default)]
    default_mode: ModeSetting,

    /// Seat the computer as X so it opens the game.
    #[serde(default)]
    computer_first: bool,

    /// How the computer scores wins and losses.
    #[serde(default)]
    scoring: ScoringPolicy,

    /// Where the terminal UI writes its log.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

#[instrument]
fn default_thinking_delay_ms() -> u64 {
    300
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("noughts.log")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: default_thinking_delay_ms(),
            default_mode: ModeSetting::default(),
            computer_first: false,
            scoring: ScoringPolicy::default(),
            log_file: default_log_file(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mode = ?config.default_mode, scoring = %config.scoring, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// The computer's thinking pause.
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    /// The mode of the first game.
    pub fn mode(&self) -> Mode {
        self.default_mode.to_mode(self.computer_first)
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, mode: Option<ModeSetting>, computer_first: bool) -> Self {
        if let Some(mode) = mode {
            self.default_mode = mode;
        }
        self.computer_first |= computer_first;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.thinking_delay(), Duration::from_millis(300));
        assert_eq!(config.mode(), Mode::vs_computer());
        assert_eq!(*config.scoring(), ScoringPolicy::Flat);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_mode = \"pvp\"\nscoring = \"prefer_faster\"").unwrap();

        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mode(), Mode::HumanVsHuman);
        assert_eq!(*config.scoring(), ScoringPolicy::PreferFaster);
        assert_eq!(*config.thinking_delay_ms(), 300);
        assert_eq!(config.log_file(), &PathBuf::from("noughts.log"));
    }

    #[test]
    fn test_computer_first_seats_computer_as_x() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "computer_first = true\nthinking_delay_ms = 0").unwrap();

        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mode(), Mode::HumanVsComputer { computer: Mark::X });
        assert_eq!(config.thinking_delay(), Duration::ZERO);
    }

    #[test]
    fn test_bad_file_reports_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_mode = \"lan\"").unwrap();

        let err = GameConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = GameConfig::default().with_overrides(Some(ModeSetting::Pvp), false);
        assert_eq!(config.mode(), Mode::HumanVsHuman);

        let config = GameConfig::default().with_overrides(None, true);
        assert_eq!(config.mode(), Mode::HumanVsComputer { computer: Mark::X });
    }
}
