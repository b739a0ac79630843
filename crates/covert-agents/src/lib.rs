//! Actors, items, objects, and AI state for the Covert simulation.
//!
//! This crate owns everything that sits *on* the grid: actors with their
//! inventories and AI components, floor items, and world objects. It also
//! holds the shared incident-report registry and the cause-of-death
//! vocabulary. Nothing here touches the tile map or the scheduler; the
//! engine in `covert-core` combines these pieces.
//!
//! # Modules
//!
//! - [`actor`] -- [`Actor`] and the [`ActorManager`] registry
//! - [`ai`] -- Behavior-state stack, schedule, suspicion ([`AiComponent`])
//! - [`config`] -- [`DamageConfig`] thresholds for damage handlers
//! - [`death`] -- [`CauseOfDeath`] templates and rendering
//! - [`error`] -- Error types for registry bookkeeping
//! - [`incident`] -- Shared [`IncidentRegistry`] keyed by observation and location
//! - [`inventory`] -- Per-actor [`Inventory`]
//! - [`item`] -- [`Item`] reactions and the floor [`ItemStore`]
//! - [`knowledge`] -- Per-actor [`IndividualKnowledge`]
//! - [`object`] -- [`WorldObject`] reactions and the [`ObjectStore`]

pub mod actor;
pub mod ai;
pub mod config;
pub mod death;
pub mod error;
pub mod incident;
pub mod inventory;
pub mod item;
pub mod knowledge;
pub mod object;

pub use actor::{Actor, ActorManager, DamageRecord, Disguise};
pub use ai::{
    AiComponent, AiState, AiStateStack, MAX_SUSPICION, MovementStrategy, Schedule, ScheduledTask,
    UpdatePredicate,
};
pub use config::DamageConfig;
pub use death::{CauseOfDeath, UNKNOWN_CAUSE};
pub use error::AgentError;
pub use incident::{IncidentRegistry, IncidentReport, ReportOutcome};
pub use inventory::Inventory;
pub use item::{Item, ItemReaction, ItemStore};
pub use knowledge::IndividualKnowledge;
pub use object::{ObjectKind, ObjectReaction, ObjectStore, WorldObject};
