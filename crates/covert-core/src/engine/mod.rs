//! Stimulus application engine.
//!
//! [`apply`] is the single entry point for anything that happens to the
//! world: a gunshot, a spilled fuel can, a sprinkler, an explosion. A
//! direct effect is applied tile by tile, each stimulus first to the
//! things on the tile (actors, floor items, the fixture) and then to the
//! tile itself. A distributed effect is fanned out over the tiles its
//! distribution reaches: ring 0 immediately, later rings through the
//! scheduler.
//!
//! Cascades (fire spreading across fuel, current through water, one
//! explosive setting off the next) re-enter `apply` either directly or as
//! scheduled [`Command`]s. They terminate through force thresholds and the
//! one-shot guards on items, objects, and "already burning" tiles.

pub mod actor;
pub mod things;
pub mod tile;

use covert_types::{Distribution, EffectSource, Observation, Point, StimEffect, Stimulus};
use tracing::{debug, trace};

use crate::clock::seconds_to_ms;
use crate::level::Level;
use crate::notify::Notification;
use crate::perception;
use crate::scheduler::Command;

/// Apply `effect` at `location`, attributed to `source`.
pub fn apply(level: &mut Level, location: Point, source: &EffectSource, effect: &StimEffect) {
    match effect.distribution {
        Distribution::Direct => apply_direct(level, location, source, &effect.stimuli),
        Distribution::Explode { distance, pressure } => {
            let rings = level.map.wave_propagation_from(
                location,
                distance,
                pressure,
                level.config.stimulus.wall_resistance,
            );
            distribute(level, location, source, effect, rings);
            let loudness = level.config.stimulus.explosion_loudness;
            perception::sound_event_at(
                level,
                location,
                loudness,
                Observation::Explosion,
                source.actor_id(),
            );
        }
        Distribution::Liquid { distance } => {
            let rings = level.map.free_cells_for_distribution(location, distance);
            distribute(level, location, source, effect, rings);
        }
    }

    if effect.destroy_on_application {
        if let Some(item) = &source.item {
            level.destroy_item(item.id);
        }
    }
}

/// Queue `effect` to be applied at `location` after `delay_seconds`.
///
/// This is the only way cascades defer work: the effect re-enters
/// [`apply`] when the scheduler fires it.
pub fn apply_delayed(
    level: &mut Level,
    location: Point,
    source: &EffectSource,
    effect: StimEffect,
    delay_seconds: f64,
) {
    apply_delayed_ms(level, location, source, effect, seconds_to_ms(delay_seconds));
}

/// [`apply_delayed`] with the delay already in milliseconds.
pub fn apply_delayed_ms(
    level: &mut Level,
    location: Point,
    source: &EffectSource,
    effect: StimEffect,
    delay_ms: u64,
) {
    level.schedule_ms(
        delay_ms,
        Command::ApplyEffect {
            location,
            source: Box::new(source.clone()),
            effect,
        },
    );
}

/// Run one deferred command.
///
/// Commands re-check their own preconditions: a poison kill on an actor
/// that already died, or a recheck on one that walked out of the fire,
/// does nothing.
pub fn execute(level: &mut Level, command: Command) {
    match command {
        Command::ApplyEffect {
            location,
            source,
            effect,
        } => apply(level, location, &source, &effect),
        Command::KillActor {
            actor: victim,
            kind,
            source,
        } => {
            actor::kill_actor(level, victim, kind, &source);
        }
        Command::StartVomiting { actor: victim } => actor::start_vomiting(level, victim),
        Command::StopVomiting { actor: victim } => actor::stop_vomiting(level, victim),
        Command::FireRecheck {
            actor: victim,
            source,
        } => actor::fire_recheck(level, victim, &source),
    }
}

/// Apply one stimulus to everything standing, lying, or fixed on a tile.
///
/// Actors first (upright, then downed, each once), then intact floor
/// items, then the tile's fixture.
pub fn apply_stimulus_to_things(
    level: &mut Level,
    location: Point,
    source: &EffectSource,
    stimulus: Stimulus,
) {
    for id in level.actors.occupants(location) {
        actor::apply_stimulus_to_actor(level, id, source, stimulus);
    }
    for id in level.items.at(location) {
        things::apply_stimulus_to_item(level, id, source, stimulus);
    }
    if let Some(id) = level.objects.at(location) {
        things::apply_stimulus_to_object(level, id, source, stimulus);
    }
}

fn apply_direct(level: &mut Level, location: Point, source: &EffectSource, stimuli: &[Stimulus]) {
    if !level.map.contains(location) {
        trace!(%location, "Effect outside map ignored");
        return;
    }
    for &stimulus in stimuli {
        apply_stimulus_to_things(level, location, source, stimulus);
        tile::apply_stimulus_to_tile(level, location, source, stimulus);
    }
}

/// Fan a distributed effect out over its rings.
fn distribute(
    level: &mut Level,
    origin: Point,
    source: &EffectSource,
    effect: &StimEffect,
    rings: Vec<Vec<Point>>,
) {
    if rings.is_empty() {
        return;
    }
    debug!(
        %origin,
        distribution = ?effect.distribution,
        rings = rings.len(),
        "Distributing effect"
    );
    level.notify(Notification::Distribution {
        origin,
        rings: rings.clone(),
    });

    let direct = effect.as_direct();
    let interval_ms = seconds_to_ms(level.config.stimulus.ring_interval);
    for (ring, tiles) in rings.into_iter().enumerate() {
        let delay_ms = interval_ms.saturating_mul(u64::try_from(ring).unwrap_or(u64::MAX));
        for location in tiles {
            if delay_ms == 0 {
                apply_direct(level, location, source, &direct.stimuli);
            } else {
                apply_delayed_ms(level, location, source, direct.clone(), delay_ms);
            }
        }
    }
}
