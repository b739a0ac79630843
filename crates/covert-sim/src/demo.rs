//! The demonstration level.
//!
//! A service corridor beside a guarded suite. The player, dressed as
//! kitchen staff, shoots a fuse box sitting in a puddle, poisons a guest,
//! lights a fuel spill under the cook, and blows the suite door. Every
//! step is a scheduled effect so the whole run is driven by the tick loop.

use covert_agents::{Actor, AiComponent, AiState, Item, ObjectKind, ScheduledTask, WorldObject};
use covert_core::{Command, Level, LevelError, SimulationConfig};
use covert_types::{Direction, EffectSource, ItemType, Point, StimEffect, StimulusType, Team};
use covert_world::TileMap;
use tracing::info;

/// Layout of the level. See [`TileMap::from_ascii`] for the glyphs.
const LAYOUT: &str = "
    ##############
    #..~~~#hhhhhh#
    #......hhhhhh#
    #.ooo.#......#
    ##############
";

const FUSE_BOX: Point = Point::new(5, 1);
const SUITE_DOOR: Point = Point::new(6, 2);
const CHARGE: Point = Point::new(5, 2);
const FUEL_SPILL: Point = Point::new(2, 3);

/// Build the level and queue the player's actions.
///
/// # Errors
///
/// Returns [`LevelError`] if the layout or any placement is invalid.
pub fn build(config: SimulationConfig) -> Result<Level, LevelError> {
    let map = TileMap::from_ascii(LAYOUT)?;
    let health = config.damage.default_health;
    let player_health = config.damage.player_health;
    let door_force = config.stimulus.door_open_force;
    let mut level = Level::new(map, config)?;

    let player = level.add_actor(
        Actor::player("47", Point::new(1, 2), player_health)
            .with_disguise("Kitchen Staff", Team::Staff)
            .with_facing(Direction::East),
    )?;
    level.add_actor(
        Actor::new("Bruno", Team::Security, Point::new(3, 1), health)
            .with_ai(AiComponent::new(AiState::ScheduledMovement))
            .with_facing(Direction::West),
    )?;
    level.add_actor(
        Actor::new("Lucia", Team::Staff, Point::new(3, 3), health)
            .with_ai(AiComponent::new(AiState::ScheduledMovement))
            .with_facing(Direction::North),
    )?;
    level.add_actor(
        Actor::new("Marco", Team::Security, Point::new(11, 2), health)
            .with_ai(AiComponent::patrolling(vec![
                ScheduledTask {
                    location: Point::new(11, 2),
                    wait_seconds: 5.0,
                },
                ScheduledTask {
                    location: Point::new(8, 2),
                    wait_seconds: 5.0,
                },
            ]))
            .with_facing(Direction::West),
    )?;
    let guest = level.add_actor(
        Actor::new("Ambassador", Team::Civilian, Point::new(11, 3), health)
            .with_ai(AiComponent::new(AiState::Idle))
            .with_facing(Direction::West),
    )?;

    level.add_object(WorldObject::new(
        "Fuse Box",
        "a humming fuse box",
        FUSE_BOX,
        ObjectKind::Trigger {
            broken: false,
            on_break: StimEffect::single(StimulusType::HighVoltage, 100),
        },
    ))?;
    level.add_object(WorldObject::door(SUITE_DOOR, door_force))?;
    level.place_item(Item::explosive("Breaching Charge"), CHARGE)?;

    let pistol = Item::new(ItemType::Pistol, "Silverballer").with_illegal(true);
    let emetic = Item::new(ItemType::EmeticPoisonVial, "Rat Poison");
    let lighter = Item::new(ItemType::Generic, "Lighter");
    let with = |item: &Item| {
        level.actors.get(player).map_or_else(
            || EffectSource::from_item(item.item_ref()),
            |p| EffectSource::actor_with_item(p.actor_ref(), item.item_ref()),
        )
    };
    let (shot, dose, flame) = (with(&pistol), with(&emetic), with(&lighter));
    let pistol_id = level.give_item(player, pistol)?;
    level.give_item(player, emetic)?;
    level.give_item(player, lighter)?;
    level.equip(player, pistol_id)?;

    let guest_at = level
        .actors
        .get(guest)
        .map_or(Point::new(11, 3), |g| g.position);
    let fire = StimEffect::single(StimulusType::Fire, 50);
    let script = [
        (0.5, FUSE_BOX, shot, StimEffect::single(StimulusType::PiercingDamage, 100)),
        (2.0, guest_at, dose, StimEffect::single(StimulusType::EmeticPoison, 100)),
        (3.0, FUEL_SPILL, flame.clone(), fire.clone()),
        (20.0, CHARGE, flame, fire),
    ];
    let steps = script.len();
    for (delay, location, source, effect) in script {
        level.schedule(
            delay,
            Command::ApplyEffect {
                location,
                source: Box::new(source),
                effect,
            },
        );
    }

    info!(
        width = level.map.width(),
        height = level.map.height(),
        actors = level.actors.len(),
        objects = level.objects.len(),
        steps,
        "Demo level built"
    );
    Ok(level)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn demo_level_builds_with_a_blocked_door() {
        let level = build(SimulationConfig::default()).expect("demo builds");
        assert_eq!(level.actors.len(), 5);
        assert!(level.actors.player().is_some());
        assert!(!level.map.is_walkable(SUITE_DOOR));
        assert_eq!(level.scheduler.len(), 4);
        assert!(level.stats.disguises_worn.contains("Kitchen Staff"));
    }
}
