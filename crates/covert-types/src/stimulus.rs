//! Stimulus and effect payloads.
//!
//! A [`Stimulus`] is a typed, force-valued value. A [`StimEffect`] bundles
//! one or more stimuli with a [`Distribution`] that says how the bundle
//! spreads from the point where it is applied.

use serde::{Deserialize, Serialize};

use crate::enums::StimulusType;

/// A single typed stimulus with an intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stimulus {
    /// What kind of stimulus this is.
    pub kind: StimulusType,
    /// Intensity. Thresholds throughout the engine compare against this.
    pub force: u32,
}

impl Stimulus {
    /// Create a stimulus.
    pub const fn new(kind: StimulusType, force: u32) -> Self {
        Self { kind, force }
    }

    /// Return a copy with a different force.
    pub const fn with_force(self, force: u32) -> Self {
        Self {
            kind: self.kind,
            force,
        }
    }
}

/// How an effect spreads from its point of application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distribution {
    /// Applies to the target tile only.
    #[default]
    Direct,
    /// Wave propagation outward, attenuated by `pressure`.
    Explode {
        /// Maximum ring distance in tiles.
        distance: u32,
        /// Initial pressure; lost one point per ring, walls absorb the rest.
        pressure: u32,
    },
    /// Flood fill over walkable tiles.
    Liquid {
        /// Maximum spill distance in tiles.
        distance: u32,
    },
}

/// An ordered bundle of stimuli applied atomically to a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StimEffect {
    /// Stimuli in application order.
    pub stimuli: Vec<Stimulus>,
    /// Spread mode.
    pub distribution: Distribution,
    /// Destroy the source item once the effect is applied.
    pub destroy_on_application: bool,
}

impl StimEffect {
    /// A direct effect carrying a single stimulus.
    pub fn single(kind: StimulusType, force: u32) -> Self {
        Self {
            stimuli: vec![Stimulus::new(kind, force)],
            distribution: Distribution::Direct,
            destroy_on_application: false,
        }
    }

    /// A direct effect carrying the given stimuli in order.
    pub fn direct(stimuli: Vec<Stimulus>) -> Self {
        Self {
            stimuli,
            distribution: Distribution::Direct,
            destroy_on_application: false,
        }
    }

    /// Replace the distribution mode.
    #[must_use]
    pub const fn distributed(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Mark the effect as consuming its source item.
    #[must_use]
    pub const fn destroying_source(mut self) -> Self {
        self.destroy_on_application = true;
        self
    }

    /// A copy of this effect that applies directly to one tile.
    ///
    /// Used when a distributed effect is fanned out over its tile set.
    #[must_use]
    pub fn as_direct(&self) -> Self {
        Self {
            stimuli: self.stimuli.clone(),
            distribution: Distribution::Direct,
            destroy_on_application: false,
        }
    }

    /// Whether the effect carries a stimulus of `kind`.
    pub fn contains(&self, kind: StimulusType) -> bool {
        self.stimuli.iter().any(|s| s.kind == kind)
    }
}
