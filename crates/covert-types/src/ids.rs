//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Actors, items, world objects and incident reports all live in
//! registries keyed by these handles. Cross references between them
//! (held-by, dragging, known-by) are always one of these ids, never a
//! second owner. All ids use UUID v7 so registry iteration follows
//! creation order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an actor (player, guard, target, civilian).
    ActorId
}

define_id! {
    /// Unique identifier for an item, whether carried or lying on the floor.
    ItemId
}

define_id! {
    /// Unique identifier for a static world object (door, leaker, fuse box).
    ObjectId
}

define_id! {
    /// Unique identifier for a shared incident report.
    IncidentId
}
