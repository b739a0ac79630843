//! Item and object reactions.
//!
//! Items and fixtures decide for themselves whether a stimulus sets them
//! off (see `Item::react` and `WorldObject::react`); this module carries
//! the consequences back into the world. The actor behind the triggering
//! stimulus stays attributed, so a guard killed by a fuel can the player
//! shot is the player's kill.

use covert_agents::ObjectReaction;
use covert_types::{EffectSource, ItemId, ObjectId, Observation, Stimulus};
use tracing::{debug, info, warn};

use crate::engine::apply;
use crate::level::Level;
use crate::notify::Notification;
use crate::perception;

/// Offer a stimulus to a floor item.
pub fn apply_stimulus_to_item(
    level: &mut Level,
    id: ItemId,
    source: &EffectSource,
    stimulus: Stimulus,
) {
    let Some(item) = level.items.get_mut(id) else {
        return;
    };
    let Some(reaction) = item.react(stimulus) else {
        return;
    };
    let Some(at) = item.position else {
        return;
    };
    debug!(item = %id, kind = ?stimulus.kind, %at, "Item reacts");

    let attributed = EffectSource {
        actor: source.actor.clone(),
        item: Some(item.item_ref()),
        ..EffectSource::default()
    };
    apply(level, at, &attributed, &reaction.effect);
}

/// Offer a stimulus to a world object.
pub fn apply_stimulus_to_object(
    level: &mut Level,
    id: ObjectId,
    source: &EffectSource,
    stimulus: Stimulus,
) {
    let Some(object) = level.objects.get_mut(id) else {
        return;
    };
    let reaction = object.react(stimulus);
    let at = object.position;
    let attributed = EffectSource {
        actor: source.actor.clone(),
        object: Some(object.object_ref()),
        ..EffectSource::default()
    };

    match reaction {
        ObjectReaction::None => {}
        ObjectReaction::DoorOpened => {
            if let Err(err) = level.map.set_walkable(at, true) {
                warn!(object = %id, %at, error = %err, "Opened door outside map");
            }
            info!(object = %id, %at, kind = ?stimulus.kind, "Door forced open");
            level.notify(Notification::DoorOpened { object: id, at });
        }
        ObjectReaction::Leak(effect) => {
            debug!(object = %id, %at, "Object leaking");
            apply(level, at, &attributed, &effect);
        }
        ObjectReaction::Noise(loudness) => {
            level.notify(Notification::ObjectBroken { object: id, at });
            perception::sound_event_at(level, at, loudness, Observation::Distraction, None);
        }
        ObjectReaction::Triggered(effect) => {
            info!(object = %id, %at, "Object triggered");
            level.notify(Notification::ObjectBroken { object: id, at });
            apply(level, at, &attributed, &effect);
        }
    }
}
