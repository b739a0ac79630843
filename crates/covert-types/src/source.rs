//! Effect attribution.
//!
//! Every applied effect carries an [`EffectSource`] naming who or what
//! caused it, so that deaths and incidents can later be reported as
//! "who did what with what". Sources are never consulted for control flow.

use serde::{Deserialize, Serialize};

use crate::enums::ItemType;
use crate::geometry::Point;
use crate::ids::{ActorId, ItemId, ObjectId};

/// Non-owning snapshot of an actor's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    /// Actor handle.
    pub id: ActorId,
    /// Display name at the time the effect was caused.
    pub name: String,
}

/// Non-owning snapshot of an item's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    /// Item handle.
    pub id: ItemId,
    /// Item kind, used for cause-of-death phrasing.
    pub kind: ItemType,
    /// Display name.
    pub name: String,
}

/// Non-owning snapshot of a world object's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Object handle.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Longer description for reports.
    pub description: String,
}

/// The originator of an effect.
///
/// Exactly one of the fields is populated, except for the composed
/// "actor used item" form built by [`EffectSource::actor_with_item`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectSource {
    /// The actor responsible, if any.
    pub actor: Option<ActorRef>,
    /// The item involved, if any.
    pub item: Option<ItemRef>,
    /// The world object responsible, if any.
    pub object: Option<ObjectRef>,
    /// The tile responsible (environmental effects), if any.
    pub tile: Option<Point>,
}

impl EffectSource {
    /// Attribute to an actor.
    pub const fn from_actor(actor: ActorRef) -> Self {
        Self {
            actor: Some(actor),
            item: None,
            object: None,
            tile: None,
        }
    }

    /// Attribute to an item acting on its own (leaking canister, bomb).
    pub const fn from_item(item: ItemRef) -> Self {
        Self {
            actor: None,
            item: Some(item),
            object: None,
            tile: None,
        }
    }

    /// Attribute to a world object.
    pub const fn from_object(object: ObjectRef) -> Self {
        Self {
            actor: None,
            item: None,
            object: Some(object),
            tile: None,
        }
    }

    /// Attribute to a tile (fire spreading, conducting water).
    pub const fn from_tile(tile: Point) -> Self {
        Self {
            actor: None,
            item: None,
            object: None,
            tile: Some(tile),
        }
    }

    /// Attribute to an actor using an item.
    pub const fn actor_with_item(actor: ActorRef, item: ItemRef) -> Self {
        Self {
            actor: Some(actor),
            item: Some(item),
            object: None,
            tile: None,
        }
    }

    /// The responsible actor's id, if an actor is attributed.
    pub fn actor_id(&self) -> Option<ActorId> {
        self.actor.as_ref().map(|a| a.id)
    }

    /// The involved item's kind, if an item is attributed.
    pub fn item_kind(&self) -> Option<ItemType> {
        self.item.as_ref().map(|i| i.kind)
    }
}
