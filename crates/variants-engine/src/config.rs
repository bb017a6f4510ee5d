//! Configuration file loading.
//!
//! A game configuration names the variant, the time control handed to the
//! clock collaborator and the directory saved games go to. Missing fields
//! fall back to defaults, and a missing file means the default
//! configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use variants_core::Color;

use crate::rules::Variant;
use crate::Game;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A per-color override names a color that is not a player.
    #[error("Unknown player color in clock overrides: {0}")]
    UnknownColor(String),
}

/// Starting time and per-move increment for one player.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct TimeControl {
    /// Time on the clock at the start, in seconds.
    #[serde(default = "default_initial_seconds")]
    pub initial_seconds: u64,
    /// Time added after each move, in seconds.
    #[serde(default)]
    pub increment_seconds: u64,
}

fn default_initial_seconds() -> u64 {
    600
}

impl Default for TimeControl {
    fn default() -> Self {
        TimeControl {
            initial_seconds: default_initial_seconds(),
            increment_seconds: 0,
        }
    }
}

/// Clock settings consumed by the external clock.
///
/// The rules never consult the clock; a fallen flag reaches the game as
/// [`Game::timeout`].
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ClockConfig {
    /// Time control shared by every player.
    #[serde(flatten)]
    pub default: TimeControl,
    /// Overrides keyed by lowercase color name (e.g. `red`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub players: BTreeMap<String, TimeControl>,
}

impl ClockConfig {
    /// Returns the time control that applies to `color`.
    pub fn time_control(&self, color: Color) -> TimeControl {
        self.players
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(color.name()))
            .map(|(_, tc)| *tc)
            .unwrap_or(self.default)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for name in self.players.keys() {
            let known = Color::ALL
                .iter()
                .filter(|c| c.is_player())
                .any(|c| name.eq_ignore_ascii_case(c.name()));
            if !known {
                return Err(ConfigError::UnknownColor(name.clone()));
            }
        }
        Ok(())
    }
}

/// Main game configuration structure.
///
/// Uses `variants.toml` in the current directory by default.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Variant to play. Defaults to classical chess.
    #[serde(default)]
    pub variant: Variant,
    /// Clock settings.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Directory saved game records are written to.
    #[serde(default = "default_record_dir")]
    pub record_dir: PathBuf,
}

fn default_record_dir() -> PathBuf {
    PathBuf::from("games")
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            variant: Variant::default(),
            clock: ClockConfig::default(),
            record_dir: default_record_dir(),
        }
    }
}

impl GameConfig {
    /// Returns the default configuration file path.
    pub fn config_path() -> PathBuf {
        PathBuf::from("variants.toml")
    }

    /// Loads the configuration at `path`, or the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it contains invalid TOML, or
    /// [`ConfigError::UnknownColor`] for an override of a non-player color.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.clock.validate()?;
        Ok(config)
    }

    /// Starts a new game of the configured variant.
    pub fn new_game(&self) -> Game {
        Game::new(self.variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
variant = "chaturaji"
record_dir = "/tmp/records"

[clock]
initial_seconds = 300
increment_seconds = 5

[clock.players.red]
initial_seconds = 120
"#;
        let config = GameConfig::from_toml(toml_content).unwrap();
        assert_eq!(config.variant, Variant::Chaturaji);
        assert_eq!(config.record_dir, PathBuf::from("/tmp/records"));
        assert_eq!(
            config.clock.time_control(Color::Blue),
            TimeControl {
                initial_seconds: 300,
                increment_seconds: 5
            }
        );
        assert_eq!(
            config.clock.time_control(Color::Red),
            TimeControl {
                initial_seconds: 120,
                increment_seconds: 0
            }
        );
        assert_eq!(config.new_game().side_to_move(), Color::Red);
    }

    #[test]
    fn test_defaults_applied() {
        let config = GameConfig::from_toml("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.variant, Variant::Classical);
        assert_eq!(config.clock.time_control(Color::White).initial_seconds, 600);
        assert_eq!(config.record_dir, PathBuf::from("games"));
    }

    #[test]
    fn test_kebab_case_variant() {
        let config = GameConfig::from_toml(r#"variant = "fog-of-war""#).unwrap();
        assert_eq!(config.variant, Variant::FogOfWar);
    }

    #[test]
    fn test_unknown_override_color() {
        let toml_content = r#"
[clock.players.grey]
initial_seconds = 1
"#;
        assert!(matches!(
            GameConfig::from_toml(toml_content),
            Err(ConfigError::UnknownColor(name)) if name == "grey"
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            GameConfig::from_toml("variant = "),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            GameConfig::from_toml(r#"variant = "shogi""#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("variants.toml");
        std::fs::write(&path, "variant = \"duck-chess\"\n").unwrap();
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.variant, Variant::DuckChess);
    }
}
