//! Actor rules: what each stimulus does to a living actor.
//!
//! Dead actors ignore everything. Every death goes through
//! [`kill_actor`], which runs at most once per actor no matter how many
//! lethal stimuli arrive in the same instant.

use covert_agents::{AiState, CauseOfDeath};
use covert_types::{ActorId, EffectSource, ItemType, Observation, Stimulus, StimulusType};
use tracing::{debug, info};

use crate::engine::tile;
use crate::level::Level;
use crate::notify::Notification;
use crate::perception;
use crate::scheduler::Command;
use crate::stats::KillRecord;

/// Apply one stimulus to an actor.
pub fn apply_stimulus_to_actor(
    level: &mut Level,
    id: ActorId,
    source: &EffectSource,
    stimulus: Stimulus,
) {
    let Some(actor) = level.actors.get(id) else {
        return;
    };
    if !actor.is_alive() {
        return;
    }
    let downed = actor.is_downed();

    match stimulus.kind {
        StimulusType::PiercingDamage => pierce(level, id, source, stimulus),
        StimulusType::BluntDamage => {
            if downed || stimulus.force > level.config.damage.blunt_kill_force {
                kill_actor(level, id, stimulus.kind, source);
            } else {
                knock_out(level, id);
            }
        }
        StimulusType::Fire => burn(level, id, source, stimulus),
        StimulusType::LethalPoison => {
            let delay = level.random_delay_ms(level.config.damage.lethal_poison_max_delay);
            debug!(actor = %id, delay, "Lethal poison takes effect later");
            level.schedule_ms(
                delay,
                Command::KillActor {
                    actor: id,
                    kind: stimulus.kind,
                    source: Box::new(source.clone()),
                },
            );
        }
        StimulusType::EmeticPoison => {
            let delay = level.random_delay_ms(level.config.damage.emetic_poison_max_delay);
            debug!(actor = %id, delay, "Emetic poison takes effect later");
            level.schedule_ms(delay, Command::StartVomiting { actor: id });
        }
        StimulusType::ExplosionDamage => {
            kill_actor(level, id, stimulus.kind, source);
        }
        StimulusType::InducedSleep => knock_out(level, id),
        StimulusType::HighVoltage => {
            if stimulus.force > level.config.damage.voltage_kill_force {
                kill_actor(level, id, stimulus.kind, source);
            } else {
                knock_out(level, id);
            }
        }
        StimulusType::Water | StimulusType::BurnableLiquid | StimulusType::Blood => {}
    }
}

fn pierce(level: &mut Level, id: ActorId, source: &EffectSource, stimulus: Stimulus) {
    let Some(actor) = level.actors.get(id) else {
        return;
    };
    let position = actor.position;
    let unaware = actor.is_ai_controlled() && !actor.is_in_combat();

    if unaware {
        kill_actor(level, id, stimulus.kind, source);
    } else {
        let amount = level.config.damage.piercing_damage(stimulus.force);
        if damage(level, id, stimulus.kind, amount, source) {
            kill_actor(level, id, stimulus.kind, source);
        }
    }

    let shooter = source.actor_id();
    perception::illegal_action_at(level, position, Observation::CombatSeen, shooter);

    if source.item_kind().is_some_and(ItemType::is_firearm) {
        let origin = shooter
            .and_then(|s| level.actors.get(s))
            .map_or(position, |s| s.position);
        let loudness = level.config.stimulus.gunshot_loudness;
        perception::sound_event_at(level, origin, loudness, Observation::Gunshot, shooter);
    }
}

fn burn(level: &mut Level, id: ActorId, source: &EffectSource, stimulus: Stimulus) {
    if stimulus.force < level.config.damage.fire_ignore_below {
        return;
    }
    let amount = level.config.damage.fire_damage;
    if damage(level, id, stimulus.kind, amount, source) {
        kill_actor(level, id, stimulus.kind, source);
        return;
    }

    let Some(actor) = level.actors.get_mut(id) else {
        return;
    };
    if actor.fire_recheck_pending {
        return;
    }
    actor.fire_recheck_pending = true;
    let delay = level.config.damage.fire_recheck_seconds;
    level.schedule(
        delay,
        Command::FireRecheck {
            actor: id,
            source: Box::new(source.clone()),
        },
    );
}

/// Burn again if the actor is still standing in fire.
pub fn fire_recheck(level: &mut Level, id: ActorId, source: &EffectSource) {
    let Some(actor) = level.actors.get_mut(id) else {
        return;
    };
    actor.fire_recheck_pending = false;
    if !actor.is_alive() {
        return;
    }
    let position = actor.position;
    if let Some(fire) = level.map.stimulus_on_tile(position, StimulusType::Fire) {
        apply_stimulus_to_actor(level, id, source, fire);
    }
}

/// Take `amount` health from an actor. Returns `true` if that was lethal.
fn damage(
    level: &mut Level,
    id: ActorId,
    kind: StimulusType,
    amount: i32,
    source: &EffectSource,
) -> bool {
    let tick = level.tick();
    let Some(actor) = level.actors.get_mut(id) else {
        return false;
    };
    let lethal = actor.take_damage(kind, amount, tick, source.clone());
    let is_player = actor.is_player;

    level.notify(Notification::Damage {
        actor: id,
        kind,
        amount: amount.max(0),
    });
    if is_player {
        level.notify(Notification::HudRefresh);
    }
    lethal
}

/// Kill an actor.
///
/// Returns `false` if the actor does not exist or is already dead.
/// Otherwise the remaining health is recorded as damage of `kind`, the
/// cause of death is stored, the kill lands in the mission statistics,
/// violent deaths leave blood, and witnesses get a chance to see it.
pub fn kill_actor(
    level: &mut Level,
    id: ActorId,
    kind: StimulusType,
    source: &EffectSource,
) -> bool {
    let Some(actor) = level.actors.get(id) else {
        return false;
    };
    if !actor.is_alive() {
        return false;
    }
    let remaining = actor.health;
    if remaining > 0 {
        damage(level, id, kind, remaining, source);
    }

    let tick = level.tick();
    let player = level.actors.player();
    let cause = CauseOfDeath::from_stim(kind, source);
    let report_cause = cause.describe_with_killer();
    let public_cause = cause.describe_without_killer();

    let Some(actor) = level.actors.get_mut(id) else {
        return false;
    };
    if !actor.mark_dead(cause) {
        return false;
    }
    let name = actor.name.clone();
    let position = actor.position;
    let is_player = actor.is_player;

    let by_player = source.actor_id().is_some_and(|killer| Some(killer) == player);
    info!(actor = %id, %name, cause = %report_cause, by_player, "Actor killed");

    level.stats.record_kill(KillRecord {
        victim: id,
        victim_name: name.clone(),
        cause: report_cause,
        by_player,
        tick,
    });
    level.notify(Notification::Death {
        actor: id,
        name,
        cause: public_cause,
    });
    if is_player {
        level.notify(Notification::HudRefresh);
    }

    if matches!(
        kind,
        StimulusType::PiercingDamage | StimulusType::BluntDamage | StimulusType::ExplosionDamage
    ) {
        tile::leave_blood(level, position);
    }

    perception::illegal_action_at(level, position, Observation::Death, source.actor_id());
    true
}

/// Knock an actor out.
pub fn knock_out(level: &mut Level, id: ActorId) {
    let Some(actor) = level.actors.get_mut(id) else {
        return;
    };
    if actor.knock_unconscious() {
        debug!(actor = %id, "Knocked unconscious");
        if actor.is_player {
            level.notify(Notification::HudRefresh);
        }
    }
}

/// Emetic poison kicks in.
pub fn start_vomiting(level: &mut Level, id: ActorId) {
    let Some(actor) = level.actors.get_mut(id) else {
        return;
    };
    if !actor.is_alive() || actor.vomiting {
        return;
    }
    actor.vomiting = true;
    if let Some(ai) = &mut actor.ai {
        ai.states.push_state(AiState::Vomiting);
    }
    debug!(actor = %id, "Started vomiting");
    level.notify(Notification::Vomiting {
        actor: id,
        started: true,
    });
    let duration = level.config.damage.vomit_duration;
    level.schedule(duration, Command::StopVomiting { actor: id });
}

/// Emetic poison wears off.
pub fn stop_vomiting(level: &mut Level, id: ActorId) {
    let Some(actor) = level.actors.get_mut(id) else {
        return;
    };
    if !actor.vomiting {
        return;
    }
    actor.vomiting = false;
    if let Some(ai) = &mut actor.ai {
        if ai.states.current() == AiState::Vomiting {
            ai.states.pop_state();
        }
    }
    debug!(actor = %id, "Stopped vomiting");
    level.notify(Notification::Vomiting {
        actor: id,
        started: false,
    });
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use covert_agents::{Actor, AiComponent, Item};
    use covert_types::{ActorStatus, Point, Team};
    use covert_world::TileMap;

    use super::*;
    use crate::config::SimulationConfig;

    fn level() -> Level {
        let map = TileMap::new(8, 8).expect("8x8 map");
        Level::new(map, SimulationConfig::default()).expect("level")
    }

    fn guard(level: &mut Level, at: Point) -> ActorId {
        level
            .add_actor(
                Actor::new("Guard", Team::Security, at, 10)
                    .with_ai(AiComponent::new(AiState::Idle)),
            )
            .expect("guard added")
    }

    #[test]
    fn unaware_ai_dies_to_a_single_stab() {
        let mut level = level();
        let id = guard(&mut level, Point::new(3, 3));
        apply_stimulus_to_actor(
            &mut level,
            id,
            &EffectSource::default(),
            Stimulus::new(StimulusType::PiercingDamage, 10),
        );
        let actor = level.actors.get(id).expect("guard exists");
        assert_eq!(actor.status, ActorStatus::Dead);
        assert!(actor.health <= 0);
        assert!(level.map.is_stimulus_on_tile(Point::new(3, 3), StimulusType::Blood));
    }

    #[test]
    fn player_takes_scaled_piercing_damage() {
        let mut level = level();
        let id = level
            .add_actor(Actor::player("47", Point::new(1, 1), 10))
            .expect("player added");
        apply_stimulus_to_actor(
            &mut level,
            id,
            &EffectSource::default(),
            Stimulus::new(StimulusType::PiercingDamage, 100),
        );
        let actor = level.actors.get(id).expect("player exists");
        assert_eq!(actor.health, 7);
        assert!(actor.is_alive());
        let notes = level.drain_notifications();
        assert!(notes.contains(&Notification::HudRefresh));
    }

    #[test]
    fn light_blunt_knocks_out_then_kills_when_downed() {
        let mut level = level();
        let id = guard(&mut level, Point::new(2, 2));
        let hit = Stimulus::new(StimulusType::BluntDamage, 30);
        apply_stimulus_to_actor(&mut level, id, &EffectSource::default(), hit);
        assert_eq!(
            level.actors.get(id).map(|a| a.status),
            Some(ActorStatus::Unconscious)
        );
        apply_stimulus_to_actor(&mut level, id, &EffectSource::default(), hit);
        assert_eq!(
            level.actors.get(id).map(|a| a.status),
            Some(ActorStatus::Dead)
        );
    }

    #[test]
    fn voltage_threshold_separates_stun_from_kill() {
        let mut level = level();
        let stunned = guard(&mut level, Point::new(1, 1));
        let killed = guard(&mut level, Point::new(2, 1));
        let source = EffectSource::default();
        apply_stimulus_to_actor(
            &mut level,
            stunned,
            &source,
            Stimulus::new(StimulusType::HighVoltage, 50),
        );
        apply_stimulus_to_actor(
            &mut level,
            killed,
            &source,
            Stimulus::new(StimulusType::HighVoltage, 51),
        );
        assert_eq!(
            level.actors.get(stunned).map(|a| a.status),
            Some(ActorStatus::Unconscious)
        );
        assert_eq!(
            level.actors.get(killed).map(|a| a.status),
            Some(ActorStatus::Dead)
        );
    }

    #[test]
    fn only_one_fire_recheck_is_pending() {
        let mut level = level();
        let id = guard(&mut level, Point::new(4, 4));
        let flame = Stimulus::new(StimulusType::Fire, 60);
        apply_stimulus_to_actor(&mut level, id, &EffectSource::default(), flame);
        apply_stimulus_to_actor(&mut level, id, &EffectSource::default(), flame);
        let rechecks = level
            .scheduler
            .pending()
            .filter(|(_, c)| matches!(c, Command::FireRecheck { .. }))
            .count();
        assert_eq!(rechecks, 1);
        assert_eq!(level.actors.get(id).map(|a| a.health), Some(8));
    }

    #[test]
    fn weak_fire_is_ignored() {
        let mut level = level();
        let id = guard(&mut level, Point::new(4, 4));
        apply_stimulus_to_actor(
            &mut level,
            id,
            &EffectSource::default(),
            Stimulus::new(StimulusType::Fire, 19),
        );
        assert_eq!(level.actors.get(id).map(|a| a.health), Some(10));
        assert!(level.scheduler.is_empty());
    }

    #[test]
    fn second_kill_is_a_no_op() {
        let mut level = level();
        let id = guard(&mut level, Point::new(5, 5));
        let source = EffectSource::default();
        assert!(kill_actor(&mut level, id, StimulusType::ExplosionDamage, &source));
        assert!(!kill_actor(&mut level, id, StimulusType::Fire, &source));
        assert_eq!(level.stats.kills.len(), 1);
        let cause = level
            .actors
            .get(id)
            .and_then(|a| a.cause_of_death.clone())
            .expect("cause recorded");
        assert_eq!(cause.describe_without_killer(), "blown to pieces");
    }

    #[test]
    fn player_kill_is_attributed() {
        let mut level = level();
        let player = level
            .add_actor(Actor::player("47", Point::new(0, 0), 10))
            .expect("player added");
        let victim = guard(&mut level, Point::new(6, 6));
        let knife = Item::new(ItemType::Knife, "Kitchen Knife");
        let source = EffectSource::actor_with_item(
            level.actors.get(player).expect("player").actor_ref(),
            knife.item_ref(),
        );
        apply_stimulus_to_actor(
            &mut level,
            victim,
            &source,
            Stimulus::new(StimulusType::PiercingDamage, 100),
        );
        assert_eq!(level.stats.player_kills(), 1);
        let record = level.stats.kills.first().expect("kill recorded");
        assert_eq!(record.cause, "stabbed with Kitchen Knife by 47");
    }

    #[test]
    fn vomiting_pushes_and_pops_its_state() {
        let mut level = level();
        let id = guard(&mut level, Point::new(2, 5));
        start_vomiting(&mut level, id);
        let current = level
            .actors
            .get(id)
            .and_then(|a| a.ai.as_ref())
            .map(|ai| ai.states.current());
        assert_eq!(current, Some(AiState::Vomiting));
        assert!(
            level
                .scheduler
                .pending()
                .any(|(due, c)| due == 10_000 && matches!(c, Command::StopVomiting { .. }))
        );

        stop_vomiting(&mut level, id);
        let ai = level.actors.get(id).and_then(|a| a.ai.as_ref()).expect("ai");
        assert_eq!(ai.states.current(), AiState::Idle);
        assert_eq!(ai.states.depth(), 1);
    }
}
