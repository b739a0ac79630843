//! Tile rules: how stimuli change the persistent state of a tile.
//!
//! Only persistent kinds are recorded. Fire needs fuel to spread and
//! never burns on water; water puts out fire and carries current across
//! the whole connected puddle. Walls hold no stimuli.

use covert_types::{EffectSource, Point, StimEffect, Stimulus, StimulusType};
use tracing::{debug, trace};

use crate::engine::{apply_delayed_ms, apply_stimulus_to_things};
use crate::level::Level;
use crate::notify::Notification;

/// Apply one stimulus to the tile at `location`.
pub fn apply_stimulus_to_tile(
    level: &mut Level,
    location: Point,
    source: &EffectSource,
    stimulus: Stimulus,
) {
    match stimulus.kind {
        StimulusType::Fire => apply_fire(level, location, source, stimulus),
        StimulusType::BurnableLiquid => apply_burnable_liquid(level, location, source, stimulus),
        StimulusType::Water => apply_water(level, location, source, stimulus),
        StimulusType::HighVoltage => electrify(level, location, source, stimulus, true),
        StimulusType::Blood => record(level, location, stimulus),
        StimulusType::LethalPoison
        | StimulusType::EmeticPoison
        | StimulusType::PiercingDamage
        | StimulusType::BluntDamage
        | StimulusType::ExplosionDamage
        | StimulusType::InducedSleep => {}
    }
}

/// Leave blood on the floor where someone died violently.
pub fn leave_blood(level: &mut Level, location: Point) {
    let force = level.config.stimulus.blood_force;
    record(level, location, Stimulus::new(StimulusType::Blood, force));
}

fn record(level: &mut Level, location: Point, stimulus: Stimulus) {
    if !level.map.is_walkable(location) {
        trace!(%location, kind = ?stimulus.kind, "Wall holds no stimulus");
        return;
    }
    level.map.add_stimulus_to_tile(location, stimulus);
}

fn apply_fire(level: &mut Level, location: Point, source: &EffectSource, stimulus: Stimulus) {
    if level.map.is_stimulus_on_tile(location, StimulusType::Water) {
        trace!(%location, "Fire doused by water");
        return;
    }

    let sustained = level.config.stimulus.fire_sustained_force;
    let min_force = level.config.stimulus.fire_min_force;
    let max_delay = level.config.stimulus.fire_spread_max_delay;

    let mut fire = stimulus;
    if level.map.is_stimulus_on_tile(location, StimulusType::BurnableLiquid) {
        fire = fire.with_force(fire.force.max(sustained));
        let map = &level.map;
        let fuel = map.filtered_cardinal_neighbors(location, |n| {
            map.is_stimulus_on_tile(n, StimulusType::BurnableLiquid)
                && !map.is_stimulus_on_tile(n, StimulusType::Fire)
        });
        for neighbor in fuel {
            let delay = level.random_delay_ms(max_delay);
            let spread = StimEffect::single(StimulusType::Fire, fire.force);
            apply_delayed_ms(level, neighbor, source, spread, delay);
        }
    }

    if fire.force >= min_force {
        record(level, location, fire);
    } else {
        trace!(%location, force = fire.force, "Fire too weak to catch");
    }
}

fn apply_burnable_liquid(
    level: &mut Level,
    location: Point,
    source: &EffectSource,
    stimulus: Stimulus,
) {
    if level.map.is_stimulus_on_tile(location, StimulusType::Water) {
        trace!(%location, "Fuel washed away by water");
        return;
    }
    record(level, location, stimulus);

    let map = &level.map;
    let burning = map
        .filtered_cardinal_neighbors(location, |n| {
            map.is_stimulus_on_tile(n, StimulusType::Fire)
        })
        .into_iter()
        .next();
    let Some(neighbor) = burning else {
        return;
    };
    let force = map
        .stimulus_on_tile(neighbor, StimulusType::Fire)
        .map_or(level.config.stimulus.fire_min_force, |s| s.force);

    let delay = level.random_delay_ms(level.config.stimulus.fire_spread_max_delay);
    debug!(%location, %neighbor, delay, "Fuel next to fire will ignite");
    for target in [neighbor, location] {
        let ignite = StimEffect::single(StimulusType::Fire, force);
        apply_delayed_ms(level, target, source, ignite, delay);
    }
}

fn apply_water(level: &mut Level, location: Point, source: &EffectSource, stimulus: Stimulus) {
    level
        .map
        .remove_stimulus_from_tile(location, StimulusType::Fire);
    level
        .map
        .remove_stimulus_from_tile(location, StimulusType::BurnableLiquid);
    record(level, location, stimulus);

    let map = &level.map;
    let puddle = map.get_connected(location, |p| {
        map.is_stimulus_on_tile(p, StimulusType::Water)
    });
    let live = puddle
        .iter()
        .flat_map(|&p| std::iter::once(p).chain(p.cardinal_neighbors()))
        .find_map(|p| map.stimulus_on_tile(p, StimulusType::HighVoltage));

    if let Some(voltage) = live {
        debug!(%location, tiles = puddle.len(), "Water touches live current");
        electrify(level, location, source, voltage, false);
    }
}

/// Carry current from `origin` across the connected water.
///
/// `origin_already_hit` is set when the things on the origin tile have
/// already received the stimulus from the caller.
fn electrify(
    level: &mut Level,
    origin: Point,
    source: &EffectSource,
    stimulus: Stimulus,
    origin_already_hit: bool,
) {
    let map = &level.map;
    let region = map.get_connected(origin, |p| {
        map.is_stimulus_on_tile(p, StimulusType::Water)
    });
    if region.is_empty() {
        return;
    }
    debug!(%origin, tiles = region.len(), force = stimulus.force, "Electrifying");
    level.notify(Notification::Electricity {
        tiles: region.clone(),
    });

    for tile in region {
        if !(origin_already_hit && tile == origin) {
            apply_stimulus_to_things(level, tile, source, stimulus);
        }
        record(level, tile, stimulus);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use covert_world::TileMap;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::scheduler::Command;

    fn level(layout: &str) -> Level {
        let map = TileMap::from_ascii(layout).expect("valid layout");
        Level::new(map, SimulationConfig::default()).expect("level")
    }

    fn fire(force: u32) -> Stimulus {
        Stimulus::new(StimulusType::Fire, force)
    }

    #[test]
    fn fire_does_not_burn_on_water() {
        let mut level = level("~");
        let at = Point::new(0, 0);
        apply_stimulus_to_tile(&mut level, at, &EffectSource::default(), fire(80));
        assert!(!level.map.is_stimulus_on_tile(at, StimulusType::Fire));
    }

    #[test]
    fn weak_fire_on_bare_floor_does_not_catch() {
        let mut level = level("..");
        let at = Point::new(0, 0);
        apply_stimulus_to_tile(&mut level, at, &EffectSource::default(), fire(10));
        assert!(!level.map.is_stimulus_on_tile(at, StimulusType::Fire));
        apply_stimulus_to_tile(&mut level, at, &EffectSource::default(), fire(20));
        assert!(level.map.is_stimulus_on_tile(at, StimulusType::Fire));
    }

    #[test]
    fn fuel_raises_fire_and_schedules_neighbors() {
        let mut level = level(
            "
            ooo
            ",
        );
        let at = Point::new(1, 0);
        apply_stimulus_to_tile(&mut level, at, &EffectSource::default(), fire(5));
        let burning = level.map.stimulus_on_tile(at, StimulusType::Fire);
        assert_eq!(burning.map(|s| s.force), Some(100));
        assert_eq!(level.scheduler.len(), 2);
        assert!(level.scheduler.pending().all(|(due, _)| due < 500));
    }

    #[test]
    fn fuel_next_to_fire_reignites_both() {
        let mut level = level("..");
        let burning = Point::new(0, 0);
        let fuel = Point::new(1, 0);
        level.map.add_stimulus_to_tile(burning, fire(40));
        apply_stimulus_to_tile(
            &mut level,
            fuel,
            &EffectSource::default(),
            Stimulus::new(StimulusType::BurnableLiquid, 50),
        );
        assert!(level.map.is_stimulus_on_tile(fuel, StimulusType::BurnableLiquid));
        let targets: Vec<Point> = level
            .scheduler
            .pending()
            .filter_map(|(_, c)| match c {
                Command::ApplyEffect { location, .. } => Some(*location),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec![burning, fuel]);
    }

    #[test]
    fn fuel_between_two_fires_takes_only_one() {
        let mut level = level("...");
        let fuel = Point::new(1, 0);
        level.map.add_stimulus_to_tile(Point::new(0, 0), fire(40));
        level.map.add_stimulus_to_tile(Point::new(2, 0), fire(40));
        apply_stimulus_to_tile(
            &mut level,
            fuel,
            &EffectSource::default(),
            Stimulus::new(StimulusType::BurnableLiquid, 50),
        );

        let queued: Vec<(u64, Point)> = level
            .scheduler
            .pending()
            .filter_map(|(due, c)| match c {
                Command::ApplyEffect { location, .. } => Some((due, *location)),
                _ => None,
            })
            .collect();
        assert_eq!(queued.len(), 2);
        assert!(queued.iter().any(|&(_, p)| p == fuel));
        // Both ignitions share one delay.
        assert!(queued.windows(2).all(|w| matches!(w, [a, b] if a.0 == b.0)));
    }

    #[test]
    fn water_puts_out_fire_and_washes_fuel() {
        let mut level = level("o");
        let at = Point::new(0, 0);
        level.map.add_stimulus_to_tile(at, fire(100));
        apply_stimulus_to_tile(
            &mut level,
            at,
            &EffectSource::default(),
            Stimulus::new(StimulusType::Water, 50),
        );
        assert!(!level.map.is_stimulus_on_tile(at, StimulusType::Fire));
        assert!(!level.map.is_stimulus_on_tile(at, StimulusType::BurnableLiquid));
        assert!(level.map.is_stimulus_on_tile(at, StimulusType::Water));
    }

    #[test]
    fn water_next_to_live_wire_electrifies_puddle() {
        let mut level = level("x~~.");
        apply_stimulus_to_tile(
            &mut level,
            Point::new(3, 0),
            &EffectSource::default(),
            Stimulus::new(StimulusType::Water, 50),
        );
        // The puddle now reaches the wire through (1,0) and (2,0).
        for x in 1..=3 {
            assert!(
                level
                    .map
                    .is_stimulus_on_tile(Point::new(x, 0), StimulusType::HighVoltage),
                "tile {x} should be live"
            );
        }
    }

    #[test]
    fn walls_hold_nothing() {
        let mut level = level("#.");
        leave_blood(&mut level, Point::new(0, 0));
        assert!(!level.map.is_stimulus_on_tile(Point::new(0, 0), StimulusType::Blood));
        leave_blood(&mut level, Point::new(1, 0));
        assert!(level.map.is_stimulus_on_tile(Point::new(1, 0), StimulusType::Blood));
    }
}
