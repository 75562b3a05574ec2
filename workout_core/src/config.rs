//! Configuration file support for nextworkout.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nextworkout/config.toml`.

use crate::{Error, Result, WorkoutMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "nextworkout";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionDefaults,

    #[serde(default)]
    pub audio: AudioConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Values the session configurator starts from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDefaults {
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    #[serde(default = "default_reps_per_exercise")]
    pub reps_per_exercise: u32,

    #[serde(default = "default_rest_period")]
    pub rest_period: u32,

    #[serde(default = "default_time_per_rep")]
    pub time_per_rep: u32,

    #[serde(default)]
    pub workout_mode: WorkoutMode,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            reps_per_exercise: default_reps_per_exercise(),
            rest_period: default_rest_period(),
            time_per_rep: default_time_per_rep(),
            workout_mode: WorkoutMode::default(),
        }
    }
}

/// Audio cue configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Ring the terminal bell alongside each cue line
    #[serde(default = "default_true")]
    pub bell: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR)
}

fn default_rounds() -> u32 {
    2
}

fn default_reps_per_exercise() -> u32 {
    8
}

fn default_rest_period() -> u32 {
    30
}

fn default_time_per_rep() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join(APP_DIR).join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
