//! Perception: what AI actors notice and how events reach them.
//!
//! Each tick, every perceiving AI actor whose update cadence allows it
//! scans the points its [`Vision`](crate::vision::Vision) collaborator
//! says it can see. Things found there (bodies, moved weapons, blood,
//! misbehaving actors) are filed in the shared incident registry, noted in
//! the actor's own knowledge, and handed to [`escalate`].
//!
//! Events that happen between scans are pushed to witnesses directly:
//! [`illegal_action_at`] and [`suspicious_action_at`] for things seen,
//! [`sound_event_at`] for things heard.

use covert_agents::Actor;
use covert_types::{ActorId, IncidentId, Observation, Point, StimulusType, Zone};
use serde::Serialize;
use tracing::{debug, info};

use crate::level::Level;
use crate::notify::Notification;
use crate::reaction::escalate;

/// One thing an actor perceived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Perceived {
    /// Something at a place, with no culprit in sight.
    Location {
        /// The filed incident.
        incident: IncidentId,
        /// What was observed.
        observation: Observation,
        /// Where.
        location: Point,
        /// Whether the observer learned of it just now.
        newly_known: bool,
    },
    /// An actor doing something dangerous.
    Dangerous {
        /// The culprit.
        actor: ActorId,
        /// The filed incident.
        incident: IncidentId,
        /// What they were doing.
        observation: Observation,
        /// Where.
        location: Point,
        /// Whether the observer learned of it just now.
        newly_known: bool,
    },
    /// An actor doing something suspicious.
    Suspicious {
        /// The suspect.
        actor: ActorId,
        /// The filed incident.
        incident: IncidentId,
        /// What they were doing.
        observation: Observation,
        /// Where.
        location: Point,
        /// Whether the observer learned of it just now.
        newly_known: bool,
    },
}

impl Perceived {
    /// The incident behind this perception.
    pub const fn incident(&self) -> IncidentId {
        match *self {
            Self::Location { incident, .. }
            | Self::Dangerous { incident, .. }
            | Self::Suspicious { incident, .. } => incident,
        }
    }

    /// What was observed.
    pub const fn observation(&self) -> Observation {
        match *self {
            Self::Location { observation, .. }
            | Self::Dangerous { observation, .. }
            | Self::Suspicious { observation, .. } => observation,
        }
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Run one perception pass over every AI actor.
///
/// Returns the number of perceptions made.
pub fn perception_pass(level: &mut Level) -> usize {
    let tick = level.tick();
    let mut total: usize = 0;

    for observer in level.actors.ids() {
        let points = {
            let Some(actor) = level.actors.get(observer) else {
                continue;
            };
            let due = actor
                .ai
                .as_ref()
                .is_some_and(|ai| ai.update_predicate.should_update(tick));
            if !actor.perceives() || !due {
                continue;
            }
            visible_points(level, actor)
        };

        for point in points {
            for perceived in perceive_point(level, observer, point) {
                total = total.saturating_add(1);
                escalate(level, observer, &perceived);
            }
        }
    }

    total
}

/// Points inside `observer`'s vision cone that it can actually see.
fn visible_points(level: &Level, observer: &Actor) -> Vec<Point> {
    let vision = level.vision();
    let range = i32::try_from(vision.vision_range(observer)).unwrap_or(i32::MAX);
    let origin = observer.position;

    let mut points = Vec::new();
    for dy in range.saturating_neg()..=range {
        for dx in range.saturating_neg()..=range {
            let point = origin.offset(dx, dy);
            if vision.can_see_in_vision_cone(observer, point)
                && vision.can_see(observer, point, &level.map)
            {
                points.push(point);
            }
        }
    }
    points
}

/// Everything `observer` notices at `point`.
///
/// The point is assumed visible. Every finding is filed in the incident
/// registry with the observer as a knower; actor sightings are also noted
/// in the observer's knowledge.
pub fn perceive_point(level: &mut Level, observer: ActorId, point: Point) -> Vec<Perceived> {
    let tick = level.tick();
    let mut found = Vec::new();

    // Several bodies on one tile are one incident.
    let body = level
        .actors
        .downed_at(point)
        .into_iter()
        .filter_map(|id| level.actors.get(id))
        .find(|body| !body.bagged && !body.body_flagged)
        .map(|body| {
            body.cause_of_death
                .as_ref()
                .and_then(|cause| cause.source.actor_id())
        });
    if let Some(perpetrator) = body {
        let outcome = level.incidents.report(
            Observation::BodyFound,
            point,
            tick,
            Some(observer),
            perpetrator,
        );
        if outcome.created {
            level.stats.record_body_found();
            info!(%observer, %point, "Body found");
        }
        found.push(Perceived::Location {
            incident: outcome.id,
            observation: Observation::BodyFound,
            location: point,
            newly_known: outcome.newly_known,
        });
    }

    let moved_weapon = level
        .items
        .at(point)
        .into_iter()
        .filter_map(|id| level.items.get(id))
        .any(|item| item.kind.is_weapon() && item.is_moved());
    if moved_weapon {
        found.push(report_location(level, observer, Observation::WeaponFound, point));
    }

    if level.map.is_stimulus_on_tile(point, StimulusType::Blood) {
        found.push(report_location(level, observer, Observation::BloodFound, point));
    }

    if let Some(target) = level.actors.standing_at(point) {
        if target != observer {
            if let Some(sighting) = perceive_actor(level, observer, target) {
                found.push(sighting);
            }
        }
    }

    found
}

fn report_location(
    level: &mut Level,
    observer: ActorId,
    observation: Observation,
    location: Point,
) -> Perceived {
    let tick = level.tick();
    let outcome = level
        .incidents
        .report(observation, location, tick, Some(observer), None);
    Perceived::Location {
        incident: outcome.id,
        observation,
        location,
        newly_known: outcome.newly_known,
    }
}

/// Classify a visible actor as dangerous, suspicious, or neither.
///
/// Dangerous behavior wins over suspicious. A disguised actor caught
/// doing something dangerous loses the disguise for this observer.
fn perceive_actor(level: &mut Level, observer: ActorId, target: ActorId) -> Option<Perceived> {
    let tick = level.tick();
    let radius = level.config.perception.illegal_incident_radius;

    let suspect = level.actors.get(target)?;
    if !suspect.is_active() {
        return None;
    }
    let location = suspect.position;
    let is_player = suspect.is_player;
    let caught = if suspect.dragging.is_some() {
        Some(Observation::DraggingBody)
    } else if suspect.in_open_combat {
        Some(Observation::CombatSeen)
    } else {
        None
    };
    let disguise = suspect.disguise.as_ref().map(|d| d.name.clone());

    if caught.is_some() {
        if let (Some(name), Some(ai)) = (
            &disguise,
            level.actors.get_mut(observer).and_then(|o| o.ai.as_mut()),
        ) {
            if ai.knowledge.compromise_disguise(name) {
                debug!(%observer, %target, disguise = %name, "Disguise compromised");
            }
        }
    }

    let watcher = level.actors.get(observer)?;
    let knowledge = watcher.ai.as_ref().map(|ai| &ai.knowledge);
    let suspect = level.actors.get(target)?;
    let apparent = suspect.apparent_team(knowledge);
    if apparent.is_allied_with(watcher.team) {
        return None;
    }

    let compromised = disguise
        .as_deref()
        .is_some_and(|name| knowledge.is_some_and(|k| k.is_compromised(name)));
    let dangerous = caught.or_else(|| compromised.then_some(Observation::DisguiseCompromised));

    if let Some(observation) = dangerous {
        let outcome = level
            .incidents
            .report(observation, location, tick, Some(observer), Some(target));
        if let Some(ai) = level.actors.get_mut(observer).and_then(|o| o.ai.as_mut()) {
            ai.knowledge.record_dangerous(outcome.id);
        }
        if is_player && outcome.newly_known {
            level.stats.mark_spotted();
            level.notify(Notification::BeenSpotted { by: observer });
            info!(%observer, ?observation, "Player spotted");
        }
        return Some(Perceived::Dangerous {
            actor: target,
            incident: outcome.id,
            observation,
            location,
            newly_known: outcome.newly_known,
        });
    }

    let zone = level.map.zone(location);
    let observation = if suspect.inventory.shows_illegal_item() {
        Observation::IllegalItem
    } else if suspect.illegal_activity {
        Observation::IllegalAction
    } else if zone == Zone::Hostile && !apparent.is_authorized_in(zone) {
        Observation::TrespassingHostile
    } else if !apparent.is_authorized_in(zone) {
        Observation::Trespassing
    } else if level.incidents.active_illegal_near(location, radius) {
        Observation::SuspiciousAction
    } else {
        return None;
    };

    let outcome = level
        .incidents
        .report(observation, location, tick, Some(observer), Some(target));
    if let Some(ai) = level.actors.get_mut(observer).and_then(|o| o.ai.as_mut()) {
        ai.knowledge.record_suspicious(outcome.id);
    }
    Some(Perceived::Suspicious {
        actor: target,
        incident: outcome.id,
        observation,
        location,
        newly_known: outcome.newly_known,
    })
}

// ---------------------------------------------------------------------------
// Event routing
// ---------------------------------------------------------------------------

/// Whether `observer` reacts to events caused by `perpetrator`.
///
/// Observers must be perceiving, not already fighting, and not allied
/// (as far as they can tell) with the perpetrator.
fn is_eligible(level: &Level, observer: &Actor, perpetrator: Option<ActorId>) -> bool {
    if !observer.perceives() || observer.is_in_combat() {
        return false;
    }
    let Some(perpetrator) = perpetrator else {
        return true;
    };
    if perpetrator == observer.id {
        return false;
    }
    let knowledge = observer.ai.as_ref().map(|ai| &ai.knowledge);
    level
        .actors
        .get(perpetrator)
        .is_none_or(|p| !p.apparent_team(knowledge).is_allied_with(observer.team))
}

/// Witnesses of something illegal happening at `location`.
///
/// Returns the number of actors that reacted.
pub fn illegal_action_at(
    level: &mut Level,
    location: Point,
    observation: Observation,
    perpetrator: Option<ActorId>,
) -> usize {
    route_visible_event(level, location, observation, perpetrator, true)
}

/// Witnesses of something suspicious happening at `location`.
///
/// Returns the number of actors that reacted.
pub fn suspicious_action_at(
    level: &mut Level,
    location: Point,
    perpetrator: Option<ActorId>,
) -> usize {
    route_visible_event(
        level,
        location,
        Observation::SuspiciousAction,
        perpetrator,
        false,
    )
}

fn route_visible_event(
    level: &mut Level,
    location: Point,
    observation: Observation,
    perpetrator: Option<ActorId>,
    dangerous: bool,
) -> usize {
    let tick = level.tick();
    let perpetrator_at = perpetrator
        .and_then(|p| level.actors.get(p))
        .filter(|p| p.is_alive())
        .map(|p| p.position);

    // (observer, whether it can see the perpetrator)
    let witnesses: Vec<(ActorId, bool)> = level
        .actors
        .iter()
        .filter(|o| is_eligible(level, o, perpetrator))
        .filter(|o| level.vision().can_see_in_vision_cone(o, location))
        .map(|o| {
            let sees_culprit = perpetrator_at.is_some_and(|at| {
                level.vision().can_see_in_vision_cone(o, at)
                    && level.vision().can_see(o, at, &level.map)
            });
            (o.id, sees_culprit)
        })
        .collect();

    for &(observer, sees_culprit) in &witnesses {
        let outcome = level
            .incidents
            .report(observation, location, tick, Some(observer), perpetrator);
        let perceived = match perpetrator.filter(|_| sees_culprit) {
            Some(culprit) => {
                if let Some(ai) = level.actors.get_mut(observer).and_then(|o| o.ai.as_mut()) {
                    if dangerous {
                        ai.knowledge.record_dangerous(outcome.id);
                    } else {
                        ai.knowledge.record_suspicious(outcome.id);
                    }
                }
                if dangerous {
                    if level.actors.player() == Some(culprit) && outcome.newly_known {
                        level.stats.mark_spotted();
                        level.notify(Notification::BeenSpotted { by: observer });
                    }
                    Perceived::Dangerous {
                        actor: culprit,
                        incident: outcome.id,
                        observation,
                        location,
                        newly_known: outcome.newly_known,
                    }
                } else {
                    Perceived::Suspicious {
                        actor: culprit,
                        incident: outcome.id,
                        observation,
                        location,
                        newly_known: outcome.newly_known,
                    }
                }
            }
            None => Perceived::Location {
                incident: outcome.id,
                observation,
                location,
                newly_known: outcome.newly_known,
            },
        };
        escalate(level, observer, &perceived);
    }

    if !witnesses.is_empty() {
        debug!(?observation, %location, witnesses = witnesses.len(), "Event witnessed");
    }
    witnesses.len()
}

/// Propagate a sound from `origin`.
///
/// The sound travels as a wave reaching `loudness` tiles (walls damp it).
/// Each eligible actor standing in the wave either answers (speech) or
/// files a report of the noise and reacts to it.
///
/// Returns the number of actors that heard it.
pub fn sound_event_at(
    level: &mut Level,
    origin: Point,
    loudness: u32,
    observation: Observation,
    perpetrator: Option<ActorId>,
) -> usize {
    let tick = level.tick();
    let rings = level.map.wave_propagation_from(
        origin,
        loudness,
        loudness.saturating_add(1),
        level.config.stimulus.wall_resistance,
    );

    let mut heard: usize = 0;
    for tile in rings.into_iter().flatten() {
        let Some(listener) = level.actors.standing_at(tile) else {
            continue;
        };
        let eligible = level
            .actors
            .get(listener)
            .is_some_and(|l| is_eligible(level, l, perpetrator));
        if !eligible {
            continue;
        }
        heard = heard.saturating_add(1);

        if let Observation::Speech(code) = observation {
            level.notify(Notification::SpeechHeard {
                listener,
                code,
                origin,
            });
            continue;
        }

        let outcome = level
            .incidents
            .report(observation, origin, tick, Some(listener), perpetrator);
        escalate(
            level,
            listener,
            &Perceived::Location {
                incident: outcome.id,
                observation,
                location: origin,
                newly_known: outcome.newly_known,
            },
        );
    }

    if heard > 0 {
        debug!(?observation, %origin, loudness, heard, "Sound heard");
    }
    heard
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use covert_agents::{AiComponent, AiState, CauseOfDeath, Item};
    use covert_types::{Direction, ItemType, SpeechCode, Team};
    use covert_world::TileMap;

    use super::*;
    use crate::config::SimulationConfig;

    fn level() -> Level {
        let map = TileMap::new(10, 10).expect("10x10 map");
        Level::new(map, SimulationConfig::default()).expect("level")
    }

    fn ai(name: &str, team: Team, at: Point) -> Actor {
        Actor::new(name, team, at, 10)
            .with_ai(AiComponent::new(AiState::Idle))
            .with_facing(Direction::East)
    }

    #[test]
    fn body_is_found_once_and_counted_once() {
        let mut level = level();
        let guard = level
            .add_actor(ai("Guard", Team::Security, Point::new(1, 1)))
            .expect("guard");
        let at = Point::new(3, 1);
        let mut body = Actor::new("Waiter", Team::Staff, at, 10);
        body.mark_dead(CauseOfDeath::unknown());
        level.add_actor(body).expect("body");

        let first = perceive_point(&mut level, guard, at);
        let second = perceive_point(&mut level, guard, at);
        assert_eq!(first.len(), 1);
        assert!(matches!(
            first.first(),
            Some(Perceived::Location {
                observation: Observation::BodyFound,
                newly_known: true,
                ..
            })
        ));
        assert!(matches!(
            second.first(),
            Some(Perceived::Location {
                newly_known: false,
                ..
            })
        ));
        assert_eq!(level.stats.bodies_found, 1);
        assert_eq!(level.incidents.len(), 1);
    }

    #[test]
    fn armed_intruder_is_suspicious() {
        let mut level = level();
        let guard = level
            .add_actor(ai("Guard", Team::Security, Point::new(1, 1)))
            .expect("guard");
        let player = level
            .add_actor(Actor::player("47", Point::new(3, 1), 10))
            .expect("player");
        let pistol = level
            .give_item(player, Item::new(ItemType::Pistol, "Pistol"))
            .expect("pistol given");
        level.equip(player, pistol).expect("equipped");

        let seen = perceive_point(&mut level, guard, Point::new(3, 1));
        assert!(matches!(
            seen.as_slice(),
            [Perceived::Suspicious {
                observation: Observation::IllegalItem,
                ..
            }]
        ));
        let knowledge = level
            .actors
            .get(guard)
            .and_then(|g| g.ai.as_ref())
            .map(|ai| ai.knowledge.clone())
            .expect("guard knowledge");
        assert!(knowledge.last_sighting_of_suspicious_actor.is_some());
    }

    #[test]
    fn disguised_actor_caught_dragging_loses_disguise() {
        let mut level = level();
        let guard = level
            .add_actor(ai("Guard", Team::Security, Point::new(1, 1)))
            .expect("guard");
        let mut player =
            Actor::player("47", Point::new(2, 1), 10).with_disguise("Guard", Team::Security);
        player.dragging = Some(ActorId::new());
        level.add_actor(player).expect("player");

        let seen = perceive_point(&mut level, guard, Point::new(2, 1));
        assert!(matches!(
            seen.as_slice(),
            [Perceived::Dangerous {
                observation: Observation::DraggingBody,
                ..
            }]
        ));
        assert!(level.stats.been_spotted);
        let compromised = level
            .actors
            .get(guard)
            .and_then(|g| g.ai.as_ref())
            .is_some_and(|ai| ai.knowledge.is_compromised("Guard"));
        assert!(compromised);
    }

    #[test]
    fn allies_are_ignored() {
        let mut level = level();
        let guard = level
            .add_actor(ai("Guard", Team::Security, Point::new(1, 1)))
            .expect("guard");
        level
            .add_actor(ai("Cook", Team::Staff, Point::new(2, 1)))
            .expect("cook");
        assert!(perceive_point(&mut level, guard, Point::new(2, 1)).is_empty());
    }

    #[test]
    fn gunshot_is_heard_through_open_floor() {
        let mut level = level();
        let guard = level
            .add_actor(ai("Guard", Team::Security, Point::new(8, 8)))
            .expect("guard");
        let heard = sound_event_at(&mut level, Point::new(2, 2), 8, Observation::Gunshot, None);
        assert_eq!(heard, 1);
        let state = level
            .actors
            .get(guard)
            .and_then(|g| g.ai.as_ref())
            .map(|ai| ai.states.current());
        assert!(matches!(state, Some(AiState::Investigating { .. })));
    }

    #[test]
    fn speech_is_answered_not_reported() {
        let mut level = level();
        level
            .add_actor(ai("Guest", Team::Civilian, Point::new(3, 3)))
            .expect("guest");
        let heard = sound_event_at(
            &mut level,
            Point::new(2, 3),
            2,
            Observation::Speech(SpeechCode::Greeting),
            None,
        );
        assert_eq!(heard, 1);
        assert!(level.incidents.is_empty());
        assert!(matches!(
            level.pending_notifications(),
            [Notification::SpeechHeard { .. }]
        ));
    }

    #[test]
    fn witnesses_outside_the_cone_see_nothing() {
        let mut level = level();
        // Facing east, the event is behind.
        level
            .add_actor(ai("Guard", Team::Security, Point::new(5, 5)))
            .expect("guard");
        let reacted = illegal_action_at(&mut level, Point::new(2, 5), Observation::Death, None);
        assert_eq!(reacted, 0);
        assert!(level.incidents.is_empty());
    }

    #[test]
    fn guards_in_combat_ignore_new_events() {
        let mut level = level();
        let mut guard = ai("Guard", Team::Security, Point::new(1, 1));
        if let Some(ai) = guard.ai.as_mut() {
            ai.states.set_state(AiState::Combat { target: None });
        }
        level.add_actor(guard).expect("guard");

        let reacted = illegal_action_at(&mut level, Point::new(3, 1), Observation::Death, None);
        assert_eq!(reacted, 0);
        assert!(level.incidents.is_empty());
    }

    #[test]
    fn allied_perpetrators_are_not_reported() {
        let mut level = level();
        level
            .add_actor(ai("Cook", Team::Staff, Point::new(1, 1)))
            .expect("cook");
        let waiter = level
            .add_actor(Actor::new("Waiter", Team::Staff, Point::new(3, 1), 10))
            .expect("waiter");

        let reacted = illegal_action_at(
            &mut level,
            Point::new(3, 1),
            Observation::CombatSeen,
            Some(waiter),
        );
        assert_eq!(reacted, 0);
        assert!(level.incidents.is_empty());
    }

    #[test]
    fn suspicious_action_names_a_visible_culprit() {
        let mut level = level();
        let guest = level
            .add_actor(ai("Guest", Team::Civilian, Point::new(1, 1)))
            .expect("guest");
        let player = level
            .add_actor(Actor::player("47", Point::new(3, 1), 10))
            .expect("player");

        let reacted = suspicious_action_at(&mut level, Point::new(3, 1), Some(player));
        assert_eq!(reacted, 1);
        let incident = level
            .incidents
            .find(Observation::SuspiciousAction, Point::new(3, 1))
            .expect("incident filed");
        let sighting = level
            .actors
            .get(guest)
            .and_then(|a| a.ai.as_ref())
            .and_then(|ai| ai.knowledge.last_sighting_of_suspicious_actor);
        assert_eq!(sighting, Some(incident));
        let report = level.incidents.get(incident).expect("report");
        assert_eq!(report.perpetrator, Some(player));
    }

    #[test]
    fn suspicious_action_without_culprit_is_a_location_report() {
        let mut level = level();
        let guest = level
            .add_actor(ai("Guest", Team::Civilian, Point::new(1, 1)))
            .expect("guest");

        let reacted = suspicious_action_at(&mut level, Point::new(3, 1), None);
        assert_eq!(reacted, 1);
        assert_eq!(level.incidents.len(), 1);
        let report = level
            .incidents
            .iter()
            .next()
            .expect("one report");
        assert_eq!(report.observation, Observation::SuspiciousAction);
        assert_eq!(report.perpetrator, None);
        assert!(report.known_by.contains(&guest));

        let ai = level
            .actors
            .get(guest)
            .and_then(|a| a.ai.as_ref())
            .expect("guest ai");
        assert_eq!(ai.knowledge.last_sighting_of_suspicious_actor, None);
        assert!(matches!(ai.states.current(), AiState::Reporting { .. }));
    }
}
