//! # Configuration Management Module
//!
//! Shademire reads a small TOML file that picks the world document, the
//! progression curve, and logging behaviour. Every section has defaults, so a
//! missing file (or a missing section) still yields a playable setup.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - world file, player name, screen clearing, RNG seed
//! - [`ProgressionConfig`] - XP threshold and per-level stat steps
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shademire::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml")?;
//!     println!("World: {}", config.game.world_file);
//!
//!     Config::create_default("config.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! world_file = "data/world.json"
//! player_name = "Wanderer"
//! clear_screen = true
//! rng_seed = 42
//!
//! [progression]
//! xp_per_level = 100
//! hp_per_level = 5
//! attack_per_level = 1
//!
//! [logging]
//! level = "info"
//! file = "shademire.log"
//! ```

use anyhow::{anyhow, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_world_file")]
    pub world_file: String,
    #[serde(default = "default_player_name")]
    pub player_name: String,
    /// Clear the terminal before describing a newly entered location.
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
    /// Fixed seed for drop-table rolls; entropy-seeded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

fn default_world_file() -> String {
    "data/world.json".to_string()
}

fn default_player_name() -> String {
    "Wanderer".to_string()
}

fn default_clear_screen() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_file: default_world_file(),
            player_name: default_player_name(),
            clear_screen: default_clear_screen(),
            rng_seed: None,
        }
    }
}

/// Leveling curve. The XP needed to leave level `n` is `xp_per_level * n`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressionConfig {
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,
    #[serde(default = "default_hp_per_level")]
    pub hp_per_level: i32,
    #[serde(default = "default_attack_per_level")]
    pub attack_per_level: i32,
}

fn default_xp_per_level() -> u32 {
    100
}

fn default_hp_per_level() -> i32 {
    5
}

fn default_attack_per_level() -> i32 {
    1
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: default_xp_per_level(),
            hp_per_level: default_hp_per_level(),
            attack_per_level: default_attack_per_level(),
        }
    }
}

impl ProgressionConfig {
    /// XP required to advance past `level`.
    pub fn threshold(&self, level: u32) -> u32 {
        self.xp_per_level.saturating_mul(level.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("shademire.log".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("config file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load(path)
    }

    /// Create a default configuration file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path.display(), e))?;

        Ok(())
    }
}
