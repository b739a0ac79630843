//! Per-actor knowledge.
//!
//! Shared facts (incidents) live in the level's
//! [`IncidentRegistry`](crate::incident::IncidentRegistry); what stays with
//! the individual is which disguises it has seen through and the most
//! recent sightings that still shape its behavior.

use std::collections::BTreeSet;

use covert_types::IncidentId;
use serde::{Deserialize, Serialize};

/// What one AI actor knows that others may not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualKnowledge {
    /// Names of disguises this actor no longer falls for.
    pub compromised_disguises: BTreeSet<String>,
    /// Most recent incident in which a dangerous actor was seen.
    pub last_sighting_of_dangerous_actor: Option<IncidentId>,
    /// Most recent incident in which a suspicious actor was seen.
    pub last_sighting_of_suspicious_actor: Option<IncidentId>,
}

impl IndividualKnowledge {
    /// Empty knowledge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that `disguise` is not to be trusted.
    ///
    /// Returns `true` if this is news to the actor.
    pub fn compromise_disguise(&mut self, disguise: &str) -> bool {
        self.compromised_disguises.insert(disguise.to_owned())
    }

    /// Whether this actor has seen through `disguise`.
    pub fn is_compromised(&self, disguise: &str) -> bool {
        self.compromised_disguises.contains(disguise)
    }

    /// Note a sighting of a dangerous actor.
    pub const fn record_dangerous(&mut self, incident: IncidentId) {
        self.last_sighting_of_dangerous_actor = Some(incident);
    }

    /// Note a sighting of a suspicious actor.
    pub const fn record_suspicious(&mut self, incident: IncidentId) {
        self.last_sighting_of_suspicious_actor = Some(incident);
    }

    /// Forget everything (level restart).
    pub fn clear(&mut self) {
        self.compromised_disguises.clear();
        self.last_sighting_of_dangerous_actor = None;
        self.last_sighting_of_suspicious_actor = None;
    }
}
