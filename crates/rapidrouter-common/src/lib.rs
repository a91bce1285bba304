//! Common configuration types shared across the Rapid Router playback crates

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Character whose engine/starting sounds exist; every other character is silent there
pub const VAN_CHARACTER: &str = "Van";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Timing policy of the animation clock, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Duration of an event without an explicit override
    pub default_animation_ms: u32,
    /// Extra time a crash frame stays on screen
    pub crash_hold_ms: u32,
    /// Multiplier applied to the three turn-around manoeuvres
    pub turn_around_factor: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_animation_ms: 500,
            crash_hold_ms: 100,
            turn_around_factor: 3,
        }
    }
}

/// Editor tab the player is typing into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    #[default]
    Blockly,
    Python,
}

/// Outcome flags of the level being played; they select popup buttons and messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelFlags {
    /// Next level in the episode, if any
    pub next_level: Option<u32>,
    /// Next episode, offered once the last level of an episode is won
    pub next_episode: Option<u32>,
    /// Built-in level (as opposed to a custom or shared one)
    pub default_level: bool,
    /// Level generated by the random level generator
    pub random_level: bool,
    pub blockly_enabled: bool,
    pub python_enabled: bool,
    /// Hint text shown behind the hint button
    pub hint: String,
    /// Active editor tab when the level is won
    pub tab: EditorTab,
}

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub level: LevelFlags,
    /// Character driving the vehicles (e.g. "Van")
    pub character: String,
    /// Number of vehicle lanes reset before playback
    pub vans: usize,
    /// Directory holding the sound cue files
    pub sound_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            level: LevelFlags::default(),
            character: VAN_CHARACTER.to_string(),
            vans: 1,
            sound_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Whether the configured character is the delivery van
    pub fn is_van(&self) -> bool {
        self.character == VAN_CHARACTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_defaults() {
        let playback = PlaybackConfig::default();
        assert_eq!(playback.default_animation_ms, 500);
        assert_eq!(playback.crash_hold_ms, 100);
        assert_eq!(playback.turn_around_factor, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            character = "Dee"
            vans = 2

            [level]
            next_level = 13
            tab = "python"
            hint = "Try turning left first"

            [playback]
            crash_hold_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.character, "Dee");
        assert!(!config.is_van());
        assert_eq!(config.vans, 2);
        assert_eq!(config.level.next_level, Some(13));
        assert_eq!(config.level.hint, "Try turning left first");
        assert!(!config.level.random_level);
        assert_eq!(config.level.tab, EditorTab::Python);
        assert_eq!(config.playback.crash_hold_ms, 250);
        assert_eq!(config.playback.default_animation_ms, 500);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_default_character_is_van() {
        assert!(AppConfig::default().is_van());
        assert_eq!(AppConfig::default().level.tab, EditorTab::Blockly);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = AppConfig::from_toml("vans = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
