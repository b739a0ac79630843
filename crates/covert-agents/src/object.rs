//! World objects and their stimulus reactions.
//!
//! Objects are fixtures of the level (doors, pipes, radios, fuse boxes).
//! Each kind implements its own reaction to stimuli; the reaction is
//! returned as an [`ObjectReaction`] for the engine to carry out, since
//! opening a door or spilling a pipe touches the tile map and the
//! scheduler, which objects do not own.

use std::collections::BTreeMap;

use covert_types::{
    Distribution, ObjectId, ObjectRef, Point, StimEffect, Stimulus, StimulusType,
};
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Kind-specific object state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A door that can be forced open.
    Door {
        /// Whether the door is open (tile walkable).
        open: bool,
        /// Minimum force of a forcing stimulus.
        open_force: u32,
    },
    /// A pipe or barrel that spills when punctured.
    LiquidLeaker {
        /// Liquid kind spilled.
        liquid: StimulusType,
        /// Force of the spilled liquid.
        force: u32,
        /// Spill distance in tiles.
        spill_distance: u32,
        /// Set after the first puncture.
        leaking: bool,
    },
    /// Something that makes a noise when broken (radio, vase).
    Distractor {
        /// Set once broken.
        broken: bool,
        /// Sound radius in tiles.
        loudness: u32,
    },
    /// Something that fires an effect when broken (fuse box, gas valve).
    Trigger {
        /// Set once broken.
        broken: bool,
        /// Effect applied at the object's position on break.
        on_break: StimEffect,
    },
}

/// What an object did in response to a stimulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectReaction {
    /// Nothing happened.
    None,
    /// A door was forced open.
    DoorOpened,
    /// A leaker started spilling this effect.
    Leak(StimEffect),
    /// A distractor broke and makes a noise of this radius.
    Noise(u32),
    /// A trigger broke and fires this effect.
    Triggered(StimEffect),
}

/// A fixture placed on one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldObject {
    /// Unique handle.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Longer description for reports.
    pub description: String,
    /// Tile the object occupies.
    pub position: Point,
    /// Kind-specific state.
    pub kind: ObjectKind,
}

impl WorldObject {
    /// Create an object.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        position: Point,
        kind: ObjectKind,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            description: description.into(),
            position,
            kind,
        }
    }

    /// A closed door requiring `open_force` to break open.
    pub fn door(position: Point, open_force: u32) -> Self {
        Self::new(
            "Door",
            "a wooden door",
            position,
            ObjectKind::Door {
                open: false,
                open_force,
            },
        )
    }

    /// Attribution snapshot.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Offer a stimulus to the object.
    ///
    /// Every reaction is one-shot: an open door stays open, a leaking
    /// pipe does not leak again, a broken object stays broken.
    pub fn react(&mut self, stimulus: Stimulus) -> ObjectReaction {
        match &mut self.kind {
            ObjectKind::Door { open, open_force } => {
                let forcing = matches!(
                    stimulus.kind,
                    StimulusType::BluntDamage
                        | StimulusType::PiercingDamage
                        | StimulusType::Fire
                        | StimulusType::ExplosionDamage
                );
                if *open || !forcing || stimulus.force < *open_force {
                    return ObjectReaction::None;
                }
                *open = true;
                ObjectReaction::DoorOpened
            }
            ObjectKind::LiquidLeaker {
                liquid,
                force,
                spill_distance,
                leaking,
            } => {
                if *leaking || stimulus.kind != StimulusType::PiercingDamage {
                    return ObjectReaction::None;
                }
                *leaking = true;
                ObjectReaction::Leak(StimEffect::single(*liquid, *force).distributed(
                    Distribution::Liquid {
                        distance: *spill_distance,
                    },
                ))
            }
            ObjectKind::Distractor { broken, loudness } => {
                if *broken || !stimulus.kind.is_damage() {
                    return ObjectReaction::None;
                }
                *broken = true;
                ObjectReaction::Noise(*loudness)
            }
            ObjectKind::Trigger { broken, on_break } => {
                if *broken || !stimulus.kind.is_damage() {
                    return ObjectReaction::None;
                }
                *broken = true;
                ObjectReaction::Triggered(on_break.clone())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

/// All fixtures of the level.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: BTreeMap<ObjectId, WorldObject>,
}

impl ObjectStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateObject`] if the id is taken.
    pub fn add(&mut self, object: WorldObject) -> Result<ObjectId, AgentError> {
        let id = object.id;
        if self.objects.contains_key(&id) {
            return Err(AgentError::DuplicateObject(id));
        }
        self.objects.insert(id, object);
        Ok(id)
    }

    /// Look up an object.
    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    /// Look up an object mutably.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.get_mut(&id)
    }

    /// The object on tile `at`, if any.
    pub fn at(&self, at: Point) -> Option<ObjectId> {
        self.objects
            .values()
            .find(|o| o.position == at)
            .map(|o| o.id)
    }

    /// All objects.
    pub fn iter(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the level has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_needs_enough_force() {
        let mut door = WorldObject::door(Point::new(1, 1), 50);
        assert_eq!(
            door.react(Stimulus::new(StimulusType::BluntDamage, 30)),
            ObjectReaction::None
        );
        assert_eq!(
            door.react(Stimulus::new(StimulusType::Water, 100)),
            ObjectReaction::None
        );
        assert_eq!(
            door.react(Stimulus::new(StimulusType::ExplosionDamage, 100)),
            ObjectReaction::DoorOpened
        );
        assert_eq!(
            door.react(Stimulus::new(StimulusType::BluntDamage, 100)),
            ObjectReaction::None
        );
    }

    #[test]
    fn leaker_spills_once() {
        let mut pipe = WorldObject::new(
            "Fuel Pipe",
            "a rusty fuel pipe",
            Point::new(0, 0),
            ObjectKind::LiquidLeaker {
                liquid: StimulusType::BurnableLiquid,
                force: 50,
                spill_distance: 2,
                leaking: false,
            },
        );
        assert_eq!(
            pipe.react(Stimulus::new(StimulusType::BluntDamage, 100)),
            ObjectReaction::None
        );
        let first = pipe.react(Stimulus::new(StimulusType::PiercingDamage, 100));
        assert!(matches!(first, ObjectReaction::Leak(ref e) if e.contains(StimulusType::BurnableLiquid)));
        assert_eq!(
            pipe.react(Stimulus::new(StimulusType::PiercingDamage, 100)),
            ObjectReaction::None
        );
    }

    #[test]
    fn distractor_breaks_on_any_damage() {
        let mut radio = WorldObject::new(
            "Radio",
            "a portable radio",
            Point::new(2, 2),
            ObjectKind::Distractor {
                broken: false,
                loudness: 4,
            },
        );
        assert_eq!(
            radio.react(Stimulus::new(StimulusType::Fire, 30)),
            ObjectReaction::Noise(4)
        );
        assert_eq!(
            radio.react(Stimulus::new(StimulusType::Fire, 30)),
            ObjectReaction::None
        );
    }

    #[test]
    fn trigger_fires_configured_effect() {
        let effect = StimEffect::single(StimulusType::HighVoltage, 80);
        let mut fuse = WorldObject::new(
            "Fuse Box",
            "an exposed fuse box",
            Point::new(3, 3),
            ObjectKind::Trigger {
                broken: false,
                on_break: effect.clone(),
            },
        );
        assert_eq!(
            fuse.react(Stimulus::new(StimulusType::Water, 50)),
            ObjectReaction::None
        );
        assert_eq!(
            fuse.react(Stimulus::new(StimulusType::BluntDamage, 10)),
            ObjectReaction::Triggered(effect)
        );
    }

    #[test]
    fn store_finds_object_by_tile() {
        let mut store = ObjectStore::new();
        let id = store.add(WorldObject::door(Point::new(4, 0), 50));
        assert!(id.is_ok());
        assert_eq!(store.at(Point::new(4, 0)), id.ok());
        assert_eq!(store.at(Point::new(0, 4)), None);
    }
}
