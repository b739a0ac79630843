//! A single grid cell and its persistent stimulus set.

use std::collections::BTreeMap;

use covert_types::{Stimulus, StimulusType, Zone};
use serde::{Deserialize, Serialize};

/// Mutable runtime state of one tile.
///
/// A tile holds at most one stimulus per [`StimulusType`]. Re-adding a
/// kind that is already present replaces its force, so re-applying the
/// same stimulus never grows the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Whether actors and liquids can occupy this tile.
    pub walkable: bool,
    /// Access zone.
    pub zone: Zone,
    stimuli: BTreeMap<StimulusType, Stimulus>,
}

impl Tile {
    /// A walkable floor tile in `zone`.
    pub const fn floor(zone: Zone) -> Self {
        Self {
            walkable: true,
            zone,
            stimuli: BTreeMap::new(),
        }
    }

    /// An impassable wall tile.
    pub const fn wall() -> Self {
        Self {
            walkable: false,
            zone: Zone::Public,
            stimuli: BTreeMap::new(),
        }
    }

    /// Whether a stimulus of `kind` is recorded here.
    pub fn has(&self, kind: StimulusType) -> bool {
        self.stimuli.contains_key(&kind)
    }

    /// The recorded stimulus of `kind`, if any.
    pub fn get(&self, kind: StimulusType) -> Option<Stimulus> {
        self.stimuli.get(&kind).copied()
    }

    /// Record a stimulus, replacing any existing one of the same kind.
    pub fn insert(&mut self, stimulus: Stimulus) {
        self.stimuli.insert(stimulus.kind, stimulus);
    }

    /// Remove the stimulus of `kind`, returning it if it was present.
    pub fn remove(&mut self, kind: StimulusType) -> Option<Stimulus> {
        self.stimuli.remove(&kind)
    }

    /// Iterate over recorded stimuli in kind order.
    pub fn stimuli(&self) -> impl Iterator<Item = &Stimulus> {
        self.stimuli.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_same_kind() {
        let mut tile = Tile::floor(Zone::Public);
        tile.insert(Stimulus::new(StimulusType::Water, 10));
        tile.insert(Stimulus::new(StimulusType::Water, 10));
        assert_eq!(tile.stimuli().count(), 1);

        tile.insert(Stimulus::new(StimulusType::Water, 40));
        assert_eq!(tile.get(StimulusType::Water).map(|s| s.force), Some(40));
    }

    #[test]
    fn remove_returns_previous() {
        let mut tile = Tile::floor(Zone::Public);
        tile.insert(Stimulus::new(StimulusType::Fire, 30));
        assert!(tile.remove(StimulusType::Fire).is_some());
        assert!(tile.remove(StimulusType::Fire).is_none());
        assert!(!tile.has(StimulusType::Fire));
    }
}
