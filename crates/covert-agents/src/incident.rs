//! Shared incident reports.
//!
//! An incident is "this observation, at this place". Every AI actor that
//! notices the same `(observation, location)` pair refers to the same
//! [`IncidentReport`], so the registry deduplicates on that key. Reports
//! record who knows about them and which roles have been claimed (handler,
//! cleaner, snitch), which is how guards avoid all converging on the same
//! body.

use std::collections::{BTreeMap, BTreeSet};

use covert_types::{ActorId, IncidentId, Observation, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A shared record of one observation at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    /// Registry handle.
    pub id: IncidentId,
    /// What was observed.
    pub observation: Observation,
    /// Where it was observed.
    pub location: Point,
    /// Tick of the first report.
    pub tick: u64,
    /// Set once a handler has dealt with it; finished reports stop
    /// attracting reactions.
    pub finished_handling: bool,
    /// Security actor investigating, if any.
    pub registered_handler: Option<ActorId>,
    /// Staff actor cleaning up, if any.
    pub cleaner: Option<ActorId>,
    /// Actor who went to tell security, if any.
    pub snitch: Option<ActorId>,
    /// Actor responsible, when known.
    pub perpetrator: Option<ActorId>,
    /// Every actor aware of the incident.
    pub known_by: BTreeSet<ActorId>,
}

/// Result of a [`IncidentRegistry::report`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    /// The (possibly pre-existing) incident.
    pub id: IncidentId,
    /// Whether the report created a new incident.
    pub created: bool,
    /// Whether the reporter learned about it with this call.
    pub newly_known: bool,
}

/// Arena of incident reports, deduplicated by `(observation, location)`.
#[derive(Debug, Clone, Default)]
pub struct IncidentRegistry {
    reports: BTreeMap<IncidentId, IncidentReport>,
    index: BTreeMap<(Observation, Point), IncidentId>,
}

impl IncidentRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `observation` at `location`.
    ///
    /// Returns the existing incident if the pair was reported before,
    /// otherwise creates one. The reporter (if any) is added to
    /// `known_by`; a perpetrator fills the slot only if it is still empty.
    pub fn report(
        &mut self,
        observation: Observation,
        location: Point,
        tick: u64,
        reporter: Option<ActorId>,
        perpetrator: Option<ActorId>,
    ) -> ReportOutcome {
        let key = (observation, location);
        let (id, created) = match self.index.get(&key) {
            Some(&id) => (id, false),
            None => {
                let id = IncidentId::new();
                self.index.insert(key, id);
                self.reports.insert(
                    id,
                    IncidentReport {
                        id,
                        observation,
                        location,
                        tick,
                        finished_handling: false,
                        registered_handler: None,
                        cleaner: None,
                        snitch: None,
                        perpetrator: None,
                        known_by: BTreeSet::new(),
                    },
                );
                debug!(%id, ?observation, %location, tick, "Incident created");
                (id, true)
            }
        };

        let mut newly_known = false;
        if let Some(report) = self.reports.get_mut(&id) {
            if let Some(reporter) = reporter {
                newly_known = report.known_by.insert(reporter);
            }
            if report.perpetrator.is_none() {
                report.perpetrator = perpetrator;
            }
        }

        ReportOutcome {
            id,
            created,
            newly_known,
        }
    }

    /// Look up a report.
    pub fn get(&self, id: IncidentId) -> Option<&IncidentReport> {
        self.reports.get(&id)
    }

    /// Look up a report mutably.
    pub fn get_mut(&mut self, id: IncidentId) -> Option<&mut IncidentReport> {
        self.reports.get_mut(&id)
    }

    /// The incident for `(observation, location)`, if reported.
    pub fn find(&self, observation: Observation, location: Point) -> Option<IncidentId> {
        self.index.get(&(observation, location)).copied()
    }

    /// Whether `actor` knows about incident `id`.
    pub fn knows(&self, id: IncidentId, actor: ActorId) -> bool {
        self.reports.get(&id).is_some_and(|r| r.known_by.contains(&actor))
    }

    /// Whether an unfinished illegal incident lies within `radius` of `point`.
    pub fn active_illegal_near(&self, point: Point, radius: u32) -> bool {
        self.reports.values().any(|r| {
            !r.finished_handling
                && r.observation.is_illegal()
                && r.location.chebyshev_distance(point) <= radius
        })
    }

    /// Mark an incident as handled. Returns `false` for unknown ids.
    pub fn finish(&mut self, id: IncidentId) -> bool {
        match self.reports.get_mut(&id) {
            Some(report) => {
                report.finished_handling = true;
                true
            }
            None => false,
        }
    }

    /// All reports in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &IncidentReport> {
        self.reports.values()
    }

    /// Number of distinct incidents.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no incident has been reported.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Drop every report (level restart).
    pub fn reset(&mut self) {
        self.reports.clear();
        self.index.clear();
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn same_observation_and_location_share_one_report() {
        let mut registry = IncidentRegistry::new();
        let a = ActorId::new();
        let b = ActorId::new();
        let at = Point::new(4, 4);

        let first = registry.report(Observation::BodyFound, at, 1, Some(a), None);
        let second = registry.report(Observation::BodyFound, at, 2, Some(b), None);

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id, second.id);
        assert_eq!(registry.len(), 1);

        let report = registry.get(first.id).expect("report exists");
        assert_eq!(report.tick, 1);
        assert!(report.known_by.contains(&a));
        assert!(report.known_by.contains(&b));
    }

    #[test]
    fn repeated_report_by_same_actor_is_not_news() {
        let mut registry = IncidentRegistry::new();
        let a = ActorId::new();
        let at = Point::new(0, 0);
        assert!(registry.report(Observation::Gunshot, at, 0, Some(a), None).newly_known);
        assert!(!registry.report(Observation::Gunshot, at, 1, Some(a), None).newly_known);
    }

    #[test]
    fn different_location_is_a_different_incident() {
        let mut registry = IncidentRegistry::new();
        registry.report(Observation::BloodFound, Point::new(1, 1), 0, None, None);
        registry.report(Observation::BloodFound, Point::new(1, 2), 0, None, None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn first_perpetrator_sticks() {
        let mut registry = IncidentRegistry::new();
        let p1 = ActorId::new();
        let p2 = ActorId::new();
        let at = Point::new(2, 2);
        let id = registry.report(Observation::CombatSeen, at, 0, None, None).id;
        registry.report(Observation::CombatSeen, at, 0, None, Some(p1));
        registry.report(Observation::CombatSeen, at, 0, None, Some(p2));
        assert_eq!(registry.get(id).and_then(|r| r.perpetrator), Some(p1));
    }

    #[test]
    fn finished_incidents_are_not_active() {
        let mut registry = IncidentRegistry::new();
        let at = Point::new(5, 5);
        let id = registry.report(Observation::IllegalAction, at, 0, None, None).id;
        assert!(registry.active_illegal_near(Point::new(7, 5), 3));
        assert!(!registry.active_illegal_near(Point::new(9, 5), 3));
        assert!(registry.finish(id));
        assert!(!registry.active_illegal_near(Point::new(5, 5), 3));
    }
}
