//! Items and their stimulus reactions.
//!
//! Every item declares a table from stimulus kind to [`ItemReaction`]: a
//! force threshold, the effect the item emits when the threshold is met,
//! and whether the item is consumed. A reaction fires at most once per
//! item, and destroyed items ignore stimuli entirely.
//!
//! Items lying on the floor are owned by the level's [`ItemStore`]; items
//! carried by an actor are owned by that actor's
//! [`Inventory`](crate::inventory::Inventory).

use std::collections::{BTreeMap, BTreeSet};

use covert_types::{
    ActorId, Distribution, ItemId, ItemRef, ItemType, Point, StimEffect, Stimulus, StimulusType,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What an item does when hit by a matching stimulus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReaction {
    /// Minimum force that triggers the reaction.
    pub min_force: u32,
    /// Effect emitted at the item's location.
    pub effect: StimEffect,
    /// Whether the item is destroyed by reacting.
    pub destroy_item: bool,
}

/// A single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique handle.
    pub id: ItemId,
    /// Kind, used for legality and cause-of-death phrasing.
    pub kind: ItemType,
    /// Display name.
    pub name: String,
    /// Whether openly carrying this item is suspicious.
    pub illegal: bool,
    /// Floor position, `None` while carried.
    pub position: Option<Point>,
    /// Where the item was first placed; a weapon away from here is "moved".
    pub original_position: Option<Point>,
    /// Carrier, `None` while on the floor.
    pub held_by: Option<ActorId>,
    /// Destroyed items ignore all stimuli.
    pub destroyed: bool,
    reactions: BTreeMap<StimulusType, ItemReaction>,
    triggered: BTreeSet<StimulusType>,
}

impl Item {
    /// Create an item. Weapons are illegal by default.
    pub fn new(kind: ItemType, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            kind,
            name: name.into(),
            illegal: kind.is_weapon(),
            position: None,
            original_position: None,
            held_by: None,
            destroyed: false,
            reactions: BTreeMap::new(),
            triggered: BTreeSet::new(),
        }
    }

    /// Add a reaction to stimuli of `kind`.
    #[must_use]
    pub fn with_reaction(mut self, kind: StimulusType, reaction: ItemReaction) -> Self {
        self.reactions.insert(kind, reaction);
        self
    }

    /// Override the legality flag.
    #[must_use]
    pub const fn with_illegal(mut self, illegal: bool) -> Self {
        self.illegal = illegal;
        self
    }

    /// A fuel canister: a bullet through it spills burnable liquid.
    pub fn fuel_can(name: impl Into<String>) -> Self {
        Self::new(ItemType::FuelCan, name).with_reaction(
            StimulusType::PiercingDamage,
            ItemReaction {
                min_force: 1,
                effect: StimEffect::single(StimulusType::BurnableLiquid, 50)
                    .distributed(Distribution::Liquid { distance: 2 }),
                destroy_item: true,
            },
        )
    }

    /// An explosive charge: detonates when exposed to fire or another blast.
    pub fn explosive(name: impl Into<String>) -> Self {
        let blast = ItemReaction {
            min_force: 20,
            effect: StimEffect::direct(vec![
                Stimulus::new(StimulusType::ExplosionDamage, 100),
                Stimulus::new(StimulusType::Fire, 60),
            ])
            .distributed(Distribution::Explode {
                distance: 3,
                pressure: 20,
            }),
            destroy_item: true,
        };
        Self::new(ItemType::Explosive, name)
            .with_reaction(StimulusType::Fire, blast.clone())
            .with_reaction(StimulusType::ExplosionDamage, blast)
    }

    /// Attribution snapshot.
    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            id: self.id,
            kind: self.kind,
            name: self.name.clone(),
        }
    }

    /// Whether the item lies somewhere other than where it started.
    pub fn is_moved(&self) -> bool {
        matches!(
            (self.position, self.original_position),
            (Some(now), Some(start)) if now != start
        )
    }

    /// Offer a stimulus to the item.
    ///
    /// Returns the reaction to apply if it fires now. The reaction is
    /// marked as spent, and the item marked destroyed if the reaction
    /// consumes it.
    pub fn react(&mut self, stimulus: Stimulus) -> Option<ItemReaction> {
        if self.destroyed {
            debug!(item = %self.id, kind = ?stimulus.kind, "Stimulus on destroyed item ignored");
            return None;
        }
        if self.triggered.contains(&stimulus.kind) {
            return None;
        }
        let reaction = self.reactions.get(&stimulus.kind)?;
        if stimulus.force < reaction.min_force {
            return None;
        }
        let reaction = reaction.clone();
        self.triggered.insert(stimulus.kind);
        if reaction.destroy_item {
            self.destroyed = true;
        }
        Some(reaction)
    }
}

// ---------------------------------------------------------------------------
// Floor items
// ---------------------------------------------------------------------------

/// Items lying on the floor of the level.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: BTreeMap<ItemId, Item>,
}

impl ItemStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop `item` at `at`. The first placement becomes its original position.
    pub fn place(&mut self, mut item: Item, at: Point) -> ItemId {
        item.position = Some(at);
        item.held_by = None;
        if item.original_position.is_none() {
            item.original_position = Some(at);
        }
        let id = item.id;
        self.items.insert(id, item);
        id
    }

    /// Pick an item up off the floor.
    pub fn take(&mut self, id: ItemId) -> Option<Item> {
        let mut item = self.items.remove(&id)?;
        item.position = None;
        Some(item)
    }

    /// Look up an item.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Look up an item mutably.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    /// Intact items lying at `at`.
    pub fn at(&self, at: Point) -> Vec<ItemId> {
        self.items
            .values()
            .filter(|i| !i.destroyed && i.position == Some(at))
            .map(|i| i.id)
            .collect()
    }

    /// All floor items, destroyed ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Number of floor items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the floor is clear.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
