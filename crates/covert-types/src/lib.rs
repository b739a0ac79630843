//! Shared type definitions for the Covert simulation.
//!
//! This crate is the vocabulary every other crate in the workspace speaks:
//! identifiers, grid geometry, stimuli and effects, attribution, and
//! observations.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for actors, items, objects, incidents
//! - [`geometry`] -- Tile coordinates and facing directions
//! - [`enums`] -- Stimulus kinds, item kinds, teams, zones, actor status
//! - [`stimulus`] -- [`Stimulus`] values and [`StimEffect`] payloads
//! - [`source`] -- [`EffectSource`] attribution records
//! - [`observation`] -- [`Observation`] tags and their classifications

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod observation;
pub mod source;
pub mod stimulus;

// Re-export all public types at crate root for convenience.
pub use enums::{ActorStatus, ItemType, StimulusType, Team, Zone};
pub use geometry::{Direction, Point};
pub use ids::{ActorId, IncidentId, ItemId, ObjectId};
pub use observation::{Observation, SpeechCode};
pub use source::{ActorRef, EffectSource, ItemRef, ObjectRef};
pub use stimulus::{Distribution, StimEffect, Stimulus};
