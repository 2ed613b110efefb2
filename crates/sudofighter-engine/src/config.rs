//! Engine configuration.
//!
//! Driver parameters (tick rate, limits, file paths) plus the nested
//! `[fight]` table handed to the simulation core. Configuration can be
//! loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sudofighter_common::SchemaVersion;
use sudofighter_gameplay::FightConfig;
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "sudofighter.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    /// File is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Written by an incompatible version
    #[error("unsupported config schema {found}, expected {expected}")]
    Version {
        /// Version this build reads
        expected: SchemaVersion,
        /// Version found in the file
        found: SchemaVersion,
    },
}

/// How the scripted player behaves in headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerScript {
    /// Never moves or attacks
    Idle,
    /// Walks at the nearest opponent and attacks when in range
    #[default]
    Aggressive,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Schema version of this file
    pub schema_version: SchemaVersion,

    // === Driver Settings ===
    /// Fixed simulation steps per second
    pub tick_rate: u32,
    /// Stop after this many steps even without a result (0 = unlimited)
    pub max_ticks: u64,
    /// Pace steps to wall-clock time instead of running flat out
    pub realtime: bool,
    /// Half-width of the square arena; movement is clamped inside it
    pub arena_half_extent: f32,
    /// Scripted player behavior
    pub player_script: PlayerScript,
    /// Product name of the player's pad (None = no controller)
    pub controller_product: Option<String>,

    // === Files ===
    /// Character selection store
    pub selection_path: PathBuf,
    /// Newline-delimited JSON log of fight events (None = disabled)
    pub event_log_path: Option<PathBuf>,

    // === Fight ===
    /// Simulation parameters and combatants
    pub fight: FightConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::ENGINE_CONFIG,
            tick_rate: 60,
            max_ticks: 60 * 60 * 5,
            realtime: false,
            arena_half_extent: 10.0,
            player_script: PlayerScript::Aggressive,
            controller_product: Some("DualSense Wireless Controller".to_string()),
            selection_path: PathBuf::from("selection.toml"),
            event_log_path: None,
            fight: FightConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load and validate configuration, reporting every failure.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;

        let expected = SchemaVersion::ENGINE_CONFIG;
        if !expected.can_read(&config.schema_version) {
            return Err(ConfigError::Version {
                expected,
                found: config.schema_version,
            });
        }

        config.validate();
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(10, 240);
        self.arena_half_extent = self.arena_half_extent.clamp(1.0, 1000.0);
        self.fight.validate();
    }
}
