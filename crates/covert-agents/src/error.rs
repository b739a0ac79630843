//! Error types for the covert-agents crate.
//!
//! Registry bookkeeping (adding actors, moving items between owners) can
//! fail and returns typed errors. Stimulus handling never does: stale
//! handles there are silent no-ops.

use covert_types::{ActorId, ItemId, ObjectId};

/// Errors that can occur during actor, item and object bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Actor with the given ID was not found in the manager.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// An actor with this ID is already registered.
    #[error("duplicate actor id: {0}")]
    DuplicateActor(ActorId),

    /// Only one player actor may exist per level.
    #[error("a player actor is already registered: {0}")]
    DuplicatePlayer(ActorId),

    /// The item is not in the expected inventory.
    #[error("item {item} is not held by actor {actor}")]
    ItemNotHeld {
        /// The item.
        item: ItemId,
        /// The actor whose inventory was searched.
        actor: ActorId,
    },

    /// The item was not found on the floor.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// An object with this ID is already registered.
    #[error("duplicate object id: {0}")]
    DuplicateObject(ObjectId),
}
