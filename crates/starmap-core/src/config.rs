//! Galaxy runtime configuration.
//!
//! A built-in JSON document is compiled in; hosts may point at an override
//! file, falling back to the built-in values when it cannot be read.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

pub const BUILTIN_GALAXY_CONFIG: &str = include_str!("data/galaxy_config.json");

/// Root configuration for the galaxy runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub hyperspace: HyperspaceConfig,
    pub spawn: SpawnConfig,
    pub environment: EnvironmentConfig,
    pub jump_sprite: SpriteSheetConfig,
}

/// Where and how fast fleets drop out of hyperspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperspaceConfig {
    pub enter_min: f64,
    pub enter_max: f64,
    pub velocity: f64,
}

impl Default for HyperspaceConfig {
    fn default() -> Self {
        Self {
            enter_min: HYPERSPACE_ENTER_MIN,
            enter_max: HYPERSPACE_ENTER_MAX,
            velocity: HYPERSPACE_VEL,
        }
    }
}

/// Pacing of the fleet spawn scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub time_factor: f64,
    pub jitter: f64,
    pub formation_spread_min: i32,
    pub formation_spread_max: i32,
    pub approach_speed_factor: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            time_factor: SPAWN_TIME_FACTOR,
            jitter: SPAWN_TIME_JITTER,
            formation_spread_min: FORMATION_SPREAD_MIN,
            formation_spread_max: FORMATION_SPREAD_MAX,
            approach_speed_factor: APPROACH_SPEED_FACTOR,
        }
    }
}

/// Nebula radiation and sensor interference tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub volatility_damage_divisor: f64,
    pub interference_max: f64,
    pub interference_timer_base: f64,
    pub interference_epsilon: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            volatility_damage_divisor: VOLATILITY_DAMAGE_DIVISOR,
            interference_max: INTERFERENCE_MAX,
            interference_timer_base: INTERFERENCE_TIMER_BASE,
            interference_epsilon: INTERFERENCE_EPSILON,
        }
    }
}

/// Layout of the jump point sprite sheet used for heading quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSheetConfig {
    pub columns: u32,
    pub rows: u32,
}

impl Default for SpriteSheetConfig {
    fn default() -> Self {
        Self {
            columns: JUMP_SPRITE_COLUMNS,
            rows: JUMP_SPRITE_ROWS,
        }
    }
}

impl GalaxyConfig {
    /// The compiled-in configuration.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_GALAXY_CONFIG).unwrap_or_default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GalaxyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Load `path` if given, otherwise (or on any failure) the built-in config.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!(
                        target: "starmap::config",
                        path = %path.display(),
                        "galaxy_config.loaded=file"
                    );
                    return config;
                }
                Err(err) => {
                    tracing::warn!(
                        target: "starmap::config",
                        path = %path.display(),
                        error = %err,
                        "galaxy_config.load_failed"
                    );
                }
            }
        }
        tracing::info!(target: "starmap::config", "galaxy_config.loaded=builtin");
        Self::builtin()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hyperspace.enter_min > self.hyperspace.enter_max {
            return Err(ConfigError::InvalidHyperspaceBand {
                min: self.hyperspace.enter_min,
                max: self.hyperspace.enter_max,
            });
        }
        Ok(())
    }
}
