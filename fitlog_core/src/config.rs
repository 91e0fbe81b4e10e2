//! Configuration file support for Fitlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub user: UserConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub store: StoreConfig,
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

/// User identity and profile configuration.
///
/// The identity is threaded into every store call; the stats engine itself
/// never sees it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Height in centimeters, kept as free text like the entry field it
    /// mirrors. Unparseable values degrade BMI to Unknown.
    #[serde(default = "default_height_cm")]
    pub height_cm: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            height_cm: default_height_cm(),
        }
    }
}

/// Parameters of the stats derivation engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_goal_days")]
    pub goal_days: u32,

    #[serde(default = "default_heatmap_window_days")]
    pub heatmap_window_days: u32,

    #[serde(default)]
    pub thresholds: BadgeThresholds,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            goal_days: default_goal_days(),
            heatmap_window_days: default_heatmap_window_days(),
            thresholds: BadgeThresholds::default(),
        }
    }
}

/// Badge unlock thresholds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BadgeThresholds {
    /// Badge 1: total check-ins for the first step
    #[serde(default = "default_first_checkins")]
    pub first_checkins: usize,

    /// Badge 2: total check-ins for a full week
    #[serde(default = "default_week_checkins")]
    pub week_checkins: usize,

    /// Badge 3: consecutive-day streak length
    #[serde(default = "default_streak_days")]
    pub streak_days: u32,

    /// Badge 4: total kcal burned (strictly greater than)
    #[serde(default = "default_calories_burned")]
    pub calories_burned: u64,

    /// Badge 5: strength session count
    #[serde(default = "default_strength_sessions")]
    pub strength_sessions: usize,

    /// Badge 6: total check-ins for the halfway mark
    #[serde(default = "default_halfway_checkins")]
    pub halfway_checkins: usize,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            first_checkins: default_first_checkins(),
            week_checkins: default_week_checkins(),
            streak_days: default_streak_days(),
            calories_burned: default_calories_burned(),
            strength_sessions: default_strength_sessions(),
            halfway_checkins: default_halfway_checkins(),
        }
    }
}

/// Which log store backend to use
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Local append-only JSONL file under the data directory
    #[default]
    Jsonl,
    /// Remote PostgREST-style table
    Rest,
}

/// Log store configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Base URL of the remote store, e.g. "https://xyz.supabase.co"
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            base_url: String::new(),
            api_key: String::new(),
            table: default_table(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME")
            .expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("fitlog")
}

fn default_user_id() -> String {
    "myself".into()
}

fn default_height_cm() -> String {
    "175".into()
}

fn default_goal_days() -> u32 {
    100
}

fn default_heatmap_window_days() -> u32 {
    28
}

fn default_first_checkins() -> usize {
    1
}

fn default_week_checkins() -> usize {
    7
}

fn default_streak_days() -> u32 {
    3
}

fn default_calories_burned() -> u64 {
    3000
}

fn default_strength_sessions() -> usize {
    5
}

fn default_halfway_checkins() -> usize {
    50
}

fn default_table() -> String {
    "fitness_logs".into()
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
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("fitlog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
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

    fn validate(&self) -> Result<()> {
        if self.stats.goal_days == 0 {
            return Err(Error::Config("goal_days must be at least 1".into()));
        }
        if self.stats.heatmap_window_days == 0 {
            return Err(Error::Config(
                "heatmap_window_days must be at least 1".into(),
            ));
        }
        if self.store.backend == StoreBackend::Rest && self.store.base_url.is_empty() {
            return Err(Error::Config(
                "store.base_url is required for the rest backend".into(),
            ));
        }
        Ok(())
    }
}
