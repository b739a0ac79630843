//! Tunable parameters for actor damage handling.
//!
//! The [`DamageConfig`] struct bundles every threshold the actor-level
//! stimulus handlers compare against, so that callers (the engine, tests)
//! can override defaults. It is loaded from the `damage` section of the
//! simulation YAML.

use serde::Deserialize;

/// Configuration for how actors respond to damaging stimuli.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    /// Starting health for non-player actors (default: 10).
    pub default_health: i32,

    /// Starting health for the player (default: 10).
    pub player_health: i32,

    /// Damage of a force-100 piercing hit on a combat-ready actor (default: 3).
    pub piercing_base_damage: i32,

    /// Blunt force above which the hit kills outright (default: 75).
    pub blunt_kill_force: u32,

    /// Fire weaker than this is ignored by actors (default: 20).
    pub fire_ignore_below: u32,

    /// Damage per fire application (default: 1).
    pub fire_damage: i32,

    /// Seconds between burn checks while standing in fire (default: 1.25).
    pub fire_recheck_seconds: f64,

    /// Upper bound of the random lethal poison delay (default: 5.0).
    pub lethal_poison_max_delay: f64,

    /// Upper bound of the random emetic poison delay (default: 10.0).
    pub emetic_poison_max_delay: f64,

    /// How long a poisoned actor vomits (default: 10.0).
    pub vomit_duration: f64,

    /// Voltage above which electrocution kills (default: 50).
    pub voltage_kill_force: u32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            default_health: 10,
            player_health: 10,
            piercing_base_damage: 3,
            blunt_kill_force: 75,
            fire_ignore_below: 20,
            fire_damage: 1,
            fire_recheck_seconds: 1.25,
            lethal_poison_max_delay: 5.0,
            emetic_poison_max_delay: 10.0,
            vomit_duration: 10.0,
            voltage_kill_force: 50,
        }
    }
}

impl DamageConfig {
    /// Health lost to a piercing hit of the given force.
    ///
    /// Scales the base damage by `force / 100`; any hit with non-zero force
    /// deals at least one point.
    pub fn piercing_damage(&self, force: u32) -> i32 {
        if force == 0 {
            return 0;
        }
        let scaled = i64::from(self.piercing_base_damage)
            .saturating_mul(i64::from(force))
            .checked_div(100)
            .unwrap_or(0);
        i32::try_from(scaled).unwrap_or(i32::MAX).max(1)
    }
}
