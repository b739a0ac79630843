//! Configuration loading and typed config structures for the Covert simulation.
//!
//! The canonical configuration lives in `covert-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads it. Every section and every
//! field is optional; missing values fall back to the defaults below.

use std::path::Path;

use covert_agents::DamageConfig;
use serde::Deserialize;

/// Environment variable overriding `world.seed`.
pub const SEED_ENV_VAR: &str = "COVERT_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `covert-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Seed, tick length, run length.
    #[serde(default)]
    pub world: WorldConfig,

    /// Tile cascade thresholds and timings.
    #[serde(default)]
    pub stimulus: StimulusConfig,

    /// Actor damage thresholds.
    #[serde(default)]
    pub damage: DamageConfig,

    /// Perception and suspicion parameters.
    #[serde(default)]
    pub perception: PerceptionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `COVERT_SEED` overrides `world.seed` when set to a valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.world.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable level name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the random delays of cascades and poisons.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Game seconds per tick.
    #[serde(default = "default_seconds_per_tick")]
    pub seconds_per_tick: f64,

    /// Ticks the demonstration binary runs for.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl WorldConfig {
    /// Override the seed from `COVERT_SEED` when it parses.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SEED_ENV_VAR) {
            if let Ok(seed) = val.trim().parse() {
                self.seed = seed;
            }
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            seconds_per_tick: default_seconds_per_tick(),
            max_ticks: default_max_ticks(),
        }
    }
}

/// Thresholds and timings of the tile cascade rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StimulusConfig {
    /// Force fire is raised to on burnable liquid (default: 100).
    pub fire_sustained_force: u32,

    /// Minimum force for fire to be recorded on a tile (default: 20).
    pub fire_min_force: u32,

    /// Upper bound of the random fire spread delay, seconds (default: 0.5).
    pub fire_spread_max_delay: f64,

    /// Seconds between distribution rings (default: 0.05).
    pub ring_interval: f64,

    /// Force needed to break a door open (default: 50).
    pub door_open_force: u32,

    /// Pressure a wall absorbs before passing a wave on (default: 10).
    pub wall_resistance: u32,

    /// Sound radius of a gunshot, tiles (default: 8).
    pub gunshot_loudness: u32,

    /// Sound radius of an explosion, tiles (default: 12).
    pub explosion_loudness: u32,

    /// Force of blood left by a violent death (default: 10).
    pub blood_force: u32,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            fire_sustained_force: 100,
            fire_min_force: 20,
            fire_spread_max_delay: 0.5,
            ring_interval: 0.05,
            door_open_force: 50,
            wall_resistance: 10,
            gunshot_loudness: 8,
            explosion_loudness: 12,
            blood_force: 10,
        }
    }
}

/// Perception and suspicion parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Suspicion level at which an actor confronts a suspect (default: 3).
    pub max_suspicion: u8,

    /// Distance within which an active illegal incident makes an actor
    /// suspicious (default: 3).
    pub illegal_incident_radius: u32,

    /// Vision range of the default vision model, tiles (default: 8).
    pub vision_range: u32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            max_suspicion: 3,
            illegal_incident_radius: 3,
            vision_range: 8,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Covert".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_seconds_per_tick() -> f64 {
    0.1
}

const fn default_max_ticks() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.seed, 42);
        assert!((config.world.seconds_per_tick - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.stimulus.fire_sustained_force, 100);
        assert_eq!(config.stimulus.wall_resistance, 10);
        assert_eq!(config.damage.blunt_kill_force, 75);
        assert_eq!(config.perception.max_suspicion, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Embassy"
  seed: 7
  seconds_per_tick: 0.05
  max_ticks: 100

stimulus:
  fire_sustained_force: 120
  fire_min_force: 25
  fire_spread_max_delay: 0.25
  ring_interval: 0.1
  door_open_force: 40
  wall_resistance: 12

damage:
  piercing_base_damage: 4
  blunt_kill_force: 80

perception:
  max_suspicion: 2
  illegal_incident_radius: 4
  vision_range: 6

logging:
  level: "debug"
  json: true
"#;
        let config = SimulationConfig::parse(yaml).expect("valid yaml");
        assert_eq!(config.world.name, "Embassy");
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.max_ticks, 100);
        assert_eq!(config.stimulus.fire_sustained_force, 120);
        assert_eq!(config.stimulus.door_open_force, 40);
        // Unlisted fields keep their defaults.
        assert_eq!(config.stimulus.blood_force, 10);
        assert_eq!(config.damage.piercing_base_damage, 4);
        assert_eq!(config.damage.fire_ignore_below, 20);
        assert_eq!(config.perception.vision_range, 6);
        assert!(config.logging.json);
    }

    #[test]
    fn empty_yaml_is_all_defaults() {
        let config = SimulationConfig::parse("{}").expect("empty mapping");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("covert-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
