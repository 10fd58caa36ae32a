//! Game configuration: chosen sides, service location and pacing.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use ttt_core::{Mark, Side};
use tracing::{debug, info, instrument};

/// Presentation pauses, in milliseconds.
///
/// The values are pacing only, but every pause must exist so that moves,
/// verdicts and replies never land in the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(default)]
pub struct PacingConfig {
    /// Length of the marker animation.
    pub animation_ms: u64,
    /// From a move starting to its status evaluation.
    pub evaluation_delay_ms: u64,
    /// From the player's move settling to the AI request.
    pub ai_delay_ms: u64,
    /// From a reset to the AI's opening request when the AI starts.
    pub ai_opening_delay_ms: u64,
    /// From game over to the end-of-game announcement.
    pub announce_delay_ms: u64,
}

impl PacingConfig {
    /// Marker animation length.
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Move-to-evaluation pause.
    pub fn evaluation_delay(&self) -> Duration {
        Duration::from_millis(self.evaluation_delay_ms)
    }

    /// Pause before the AI is asked to move.
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// Pause before the AI's opening move.
    pub fn ai_opening_delay(&self) -> Duration {
        Duration::from_millis(self.ai_opening_delay_ms)
    }

    /// Pause before announcing the outcome.
    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::new(300, 350, 1000, 500, 500)
    }
}

/// Client configuration, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Mark the human plays.
    #[serde(default = "default_player_mark")]
    player_mark: Mark,

    /// Who moves first after a reset.
    #[serde(default = "default_starting_side")]
    starting_side: Side,

    /// Base URL of the AI move service.
    #[serde(default = "default_service_url")]
    service_url: String,

    /// Presentation pauses.
    #[serde(default)]
    pacing: PacingConfig,
}

#[instrument]
fn default_player_mark() -> Mark {
    Mark::X
}

#[instrument]
fn default_starting_side() -> Side {
    Side::Player
}

#[instrument]
fn default_service_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl GameConfig {
    /// Creates a configuration with default pacing.
    #[instrument(skip(service_url))]
    pub fn new(player_mark: Mark, starting_side: Side, service_url: impl Into<String>) -> Self {
        Self {
            player_mark,
            starting_side,
            service_url: service_url.into(),
            pacing: PacingConfig::default(),
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            player_mark = %config.player_mark,
            starting_side = %config.starting_side,
            service_url = %config.service_url,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the chosen mark.
    pub fn with_player_mark(mut self, mark: Mark) -> Self {
        self.player_mark = mark;
        self
    }

    /// Replaces the starting side.
    pub fn with_starting_side(mut self, side: Side) -> Self {
        self.starting_side = side;
        self
    }

    /// Replaces the service URL.
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    /// Replaces the pacing.
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Mark the AI plays.
    pub fn ai_mark(&self) -> Mark {
        self.player_mark.opponent()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(default_player_mark(), default_starting_side(), default_service_url())
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
    fn test_default_pacing() {
        let config = GameConfig::default();
        assert_eq!(*config.player_mark(), Mark::X);
        assert_eq!(config.ai_mark(), Mark::O);
        assert_eq!(*config.starting_side(), Side::Player);
        assert_eq!(config.pacing().animation(), Duration::from_millis(300));
        assert_eq!(config.pacing().evaluation_delay(), Duration::from_millis(350));
        assert_eq!(config.pacing().ai_delay(), Duration::from_millis(1000));
        assert_eq!(config.pacing().announce_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
player_mark = "O"
starting_side = "ai"

[pacing]
ai_delay_ms = 10
"#
        )
        .unwrap();

        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.player_mark(), Mark::O);
        assert_eq!(*config.starting_side(), Side::Ai);
        assert_eq!(config.service_url(), "http://127.0.0.1:5000");
        assert_eq!(config.pacing().ai_delay_ms, 10);
        assert_eq!(config.pacing().animation_ms, 300);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "player_mark = \"Q\"").unwrap();
        let err = GameConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load_or_default("/nonexistent/ttt_client.toml").unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
