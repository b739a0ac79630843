//! AI escalation: turning perceptions into behavior states.
//!
//! Security fights and investigates, staff clean up, civilians report or
//! run. Suspicion builds one step per new suspicious sighting and jumps to
//! the maximum on a dangerous one.

use covert_agents::AiState;
use covert_types::{ActorId, Team};
use tracing::{debug, info};

use crate::level::Level;
use crate::perception::Perceived;

/// React to one perception.
pub fn escalate(level: &mut Level, observer: ActorId, perceived: &Perceived) {
    let max = level.config.perception.max_suspicion;
    let Some(actor) = level.actors.get_mut(observer) else {
        return;
    };
    let team = actor.team;
    let Some(ai) = actor.ai.as_mut() else {
        return;
    };

    match *perceived {
        Perceived::Dangerous {
            actor: target,
            incident,
            location,
            ..
        } => {
            ai.max_suspicion(max);
            if ai.is_in_combat() {
                return;
            }
            if team == Team::Security {
                ai.states.set_state(AiState::Combat {
                    target: Some(target),
                });
                info!(%observer, %target, "Entering combat");
                return;
            }
            if ai.states.contains(|s| matches!(s, AiState::Fleeing { .. })) {
                return;
            }
            ai.states.push_state(AiState::Fleeing { from: location });
            debug!(%observer, %target, "Fleeing");
            if let Some(report) = level.incidents.get_mut(incident) {
                report.snitch.get_or_insert(observer);
            }
        }

        Perceived::Suspicious {
            actor: target,
            newly_known,
            ..
        } => {
            if !newly_known || ai.is_in_combat() {
                return;
            }
            let suspicion = ai.raise_suspicion(max);
            debug!(%observer, %target, suspicion, "Suspicion raised");
            let engaged = ai.states.contains(|s| matches!(s, AiState::Engaged { .. }));
            if suspicion >= max && !engaged {
                ai.states.push_state(AiState::Engaged { target });
                info!(%observer, %target, "Confronting suspect");
            }
        }

        Perceived::Location {
            incident,
            observation,
            location,
            ..
        } => {
            if ai.is_in_combat() || ai.is_handling(incident) {
                return;
            }
            let Some(report) = level.incidents.get_mut(incident) else {
                return;
            };
            if report.finished_handling {
                return;
            }

            match team {
                Team::Security => {
                    if report.registered_handler.is_none() {
                        report.registered_handler = Some(observer);
                        ai.states
                            .push_state(AiState::Investigating { incident, location });
                        info!(%observer, ?observation, %location, "Investigating");
                    } else if observation.is_dangerous_location()
                        && !ai.states.contains(|s| matches!(s, AiState::Searching { .. }))
                    {
                        ai.states.push_state(AiState::Searching { location });
                        debug!(%observer, %location, "Searching");
                    }
                }
                Team::Staff => {
                    if observation.needs_cleanup() {
                        if report.cleaner.is_none() {
                            report.cleaner = Some(observer);
                            ai.states.push_state(AiState::Cleaning { incident });
                            debug!(%observer, ?observation, "Cleaning up");
                        }
                    } else if observation.is_dangerous_location()
                        && !ai.states.contains(|s| matches!(s, AiState::Fleeing { .. }))
                    {
                        ai.states.push_state(AiState::Fleeing { from: location });
                    }
                }
                Team::Civilian => {
                    if observation.is_dangerous_location() {
                        if !ai.states.contains(|s| matches!(s, AiState::Fleeing { .. })) {
                            ai.states.push_state(AiState::Fleeing { from: location });
                            report.snitch.get_or_insert(observer);
                        }
                    } else if report.snitch.is_none() {
                        report.snitch = Some(observer);
                        ai.states.push_state(AiState::Reporting { incident });
                        debug!(%observer, ?observation, "Reporting");
                    }
                }
                Team::Intruder => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use covert_agents::{Actor, AiComponent};
    use covert_types::{Observation, Point};
    use covert_world::TileMap;

    use super::*;
    use crate::config::SimulationConfig;

    fn level() -> Level {
        let map = TileMap::new(6, 6).expect("6x6 map");
        Level::new(map, SimulationConfig::default()).expect("level")
    }

    fn add(level: &mut Level, team: Team) -> ActorId {
        level
            .add_actor(
                Actor::new("NPC", team, Point::new(1, 1), 10)
                    .with_ai(AiComponent::new(AiState::ScheduledMovement)),
            )
            .expect("actor added")
    }

    fn state(level: &Level, id: ActorId) -> AiState {
        level
            .actors
            .get(id)
            .and_then(|a| a.ai.as_ref())
            .map(|ai| ai.states.current())
            .expect("ai actor")
    }

    fn location(level: &mut Level, observation: Observation) -> Perceived {
        let at = Point::new(4, 4);
        let outcome = level.incidents.report(observation, at, 0, None, None);
        Perceived::Location {
            incident: outcome.id,
            observation,
            location: at,
            newly_known: true,
        }
    }

    #[test]
    fn suspicion_builds_to_confrontation() {
        let mut level = level();
        let guard = add(&mut level, Team::Security);
        let suspect = ActorId::new();
        for step in 1..=3 {
            let at = Point::new(step, 0);
            let outcome = level
                .incidents
                .report(Observation::Trespassing, at, 0, None, None);
            escalate(
                &mut level,
                guard,
                &Perceived::Suspicious {
                    actor: suspect,
                    incident: outcome.id,
                    observation: Observation::Trespassing,
                    location: at,
                    newly_known: true,
                },
            );
        }
        assert_eq!(state(&level, guard), AiState::Engaged { target: suspect });
    }

    #[test]
    fn repeated_sighting_does_not_raise_suspicion() {
        let mut level = level();
        let guard = add(&mut level, Team::Security);
        let outcome = level
            .incidents
            .report(Observation::IllegalItem, Point::new(2, 2), 0, None, None);
        let seen = Perceived::Suspicious {
            actor: ActorId::new(),
            incident: outcome.id,
            observation: Observation::IllegalItem,
            location: Point::new(2, 2),
            newly_known: false,
        };
        escalate(&mut level, guard, &seen);
        let suspicion = level
            .actors
            .get(guard)
            .and_then(|a| a.ai.as_ref())
            .map(AiComponent::suspicion);
        assert_eq!(suspicion, Some(0));
    }

    #[test]
    fn security_fights_dangerous_actors() {
        let mut level = level();
        let guard = add(&mut level, Team::Security);
        let target = ActorId::new();
        let outcome = level
            .incidents
            .report(Observation::CombatSeen, Point::new(2, 2), 0, None, None);
        escalate(
            &mut level,
            guard,
            &Perceived::Dangerous {
                actor: target,
                incident: outcome.id,
                observation: Observation::CombatSeen,
                location: Point::new(2, 2),
                newly_known: true,
            },
        );
        assert_eq!(
            state(&level, guard),
            AiState::Combat {
                target: Some(target)
            }
        );
    }

    #[test]
    fn first_guard_handles_second_searches() {
        let mut level = level();
        let first = add(&mut level, Team::Security);
        let second = add(&mut level, Team::Security);
        let gunshot = location(&mut level, Observation::Gunshot);
        escalate(&mut level, first, &gunshot);
        escalate(&mut level, second, &gunshot);
        assert!(matches!(
            state(&level, first),
            AiState::Investigating { .. }
        ));
        assert!(matches!(state(&level, second), AiState::Searching { .. }));
        let report = level.incidents.get(gunshot.incident()).expect("report");
        assert_eq!(report.registered_handler, Some(first));
    }

    #[test]
    fn staff_clean_and_civilians_report() {
        let mut level = level();
        let cook = add(&mut level, Team::Staff);
        let guest = add(&mut level, Team::Civilian);
        let blood = location(&mut level, Observation::BloodFound);
        escalate(&mut level, cook, &blood);
        escalate(&mut level, guest, &blood);
        assert!(matches!(state(&level, cook), AiState::Cleaning { .. }));
        assert!(matches!(state(&level, guest), AiState::Reporting { .. }));
        let report = level.incidents.get(blood.incident()).expect("report");
        assert_eq!(report.cleaner, Some(cook));
        assert_eq!(report.snitch, Some(guest));
    }

    #[test]
    fn finished_incidents_are_ignored() {
        let mut level = level();
        let guard = add(&mut level, Team::Security);
        let weapon = location(&mut level, Observation::WeaponFound);
        level.finish_incident(weapon.incident());
        escalate(&mut level, guard, &weapon);
        assert_eq!(state(&level, guard), AiState::ScheduledMovement);
    }
}
