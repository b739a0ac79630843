//! Cause-of-death phrasing.
//!
//! When an actor dies, the lethal stimulus and its [`EffectSource`] are
//! turned into a [`CauseOfDeath`]: a sentence template plus the source it
//! was built from. The template may contain a single `%s` placeholder for
//! the item involved. Rendering either mentions the killer or not,
//! depending on whether the observer knows who did it.

use covert_types::{EffectSource, ItemType, StimulusType};
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the item name when rendering.
const ITEM_PLACEHOLDER: &str = "%s";

/// Template used when nothing better is known.
pub const UNKNOWN_CAUSE: &str = "died of unknown causes";

/// Why an actor died, and who or what was responsible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseOfDeath {
    /// Sentence template, possibly containing `%s` for the item name.
    pub template: String,
    /// Attribution of the lethal effect.
    pub source: EffectSource,
}

impl CauseOfDeath {
    /// Build a cause from an explicit template.
    pub fn new(template: impl Into<String>, source: EffectSource) -> Self {
        Self {
            template: template.into(),
            source,
        }
    }

    /// Derive the cause from the lethal stimulus kind and its source.
    ///
    /// The mapping is a pure function of `(kind, item kind)`: the same
    /// inputs always produce the same template.
    pub fn from_stim(kind: StimulusType, source: &EffectSource) -> Self {
        let item = source.item_kind();
        let template = match kind {
            StimulusType::PiercingDamage => piercing_template(item),
            StimulusType::BluntDamage => blunt_template(item),
            StimulusType::Fire => "burned to death",
            StimulusType::ExplosionDamage => "blown to pieces",
            StimulusType::LethalPoison => "poisoned",
            StimulusType::HighVoltage => "electrocuted",
            _ => UNKNOWN_CAUSE,
        };
        Self::new(template, source.clone())
    }

    /// A cause with no attribution at all.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_CAUSE, EffectSource::default())
    }

    /// Render the cause without naming the killer.
    pub fn describe_without_killer(&self) -> String {
        if !self.template.contains(ITEM_PLACEHOLDER) {
            return self.template.clone();
        }
        let item_name = self
            .source
            .item
            .as_ref()
            .map_or("something", |item| item.name.as_str());
        self.template.replacen(ITEM_PLACEHOLDER, item_name, 1)
    }

    /// Render the cause, naming the killer when one is attributed.
    pub fn describe_with_killer(&self) -> String {
        let base = self.describe_without_killer();
        match &self.source.actor {
            Some(killer) => format!("{base} by {}", killer.name),
            None => base,
        }
    }
}

impl core::fmt::Display for CauseOfDeath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.describe_without_killer())
    }
}

fn piercing_template(item: Option<ItemType>) -> &'static str {
    match item {
        Some(ItemType::SniperRifle) => "sniped with %s",
        Some(ItemType::AssaultRifle) => "given a heavy lead injection with %s",
        Some(ItemType::Pistol) => "shot once with %s",
        Some(ItemType::Shotgun) => "blasted with %s",
        Some(ItemType::Smg) => "riddled with %s",
        Some(ItemType::MeleeSharp) => "sliced with %s",
        Some(ItemType::Screwdriver) => "screwed with %s",
        Some(ItemType::Knife) => "stabbed with %s",
        _ => "pierced",
    }
}

fn blunt_template(item: Option<ItemType>) -> &'static str {
    match item {
        Some(ItemType::Crowbar) => "pried apart with %s",
        Some(ItemType::MeleeBlunt) => "bludgeoned with %s",
        Some(ItemType::Wrench) => "wrenched with %s",
        _ => "beaten to death",
    }
}

#[cfg(test)]
mod tests {
    use covert_types::{ActorId, ActorRef, ItemId, ItemRef};

    use super::*;

    fn knife() -> ItemRef {
        ItemRef {
            id: ItemId::new(),
            kind: ItemType::Knife,
            name: String::from("Kitchen Knife"),
        }
    }

    fn killer() -> ActorRef {
        ActorRef {
            id: ActorId::new(),
            name: String::from("Agent Cobalt"),
        }
    }

    #[test]
    fn knife_kill_names_item_and_killer() {
        let source = EffectSource::actor_with_item(killer(), knife());
        let cause = CauseOfDeath::from_stim(StimulusType::PiercingDamage, &source);
        assert_eq!(cause.template, "stabbed with %s");
        assert_eq!(cause.describe_without_killer(), "stabbed with Kitchen Knife");
        assert_eq!(
            cause.describe_with_killer(),
            "stabbed with Kitchen Knife by Agent Cobalt"
        );
    }

    #[test]
    fn piercing_without_item_is_generic() {
        let cause = CauseOfDeath::from_stim(StimulusType::PiercingDamage, &EffectSource::default());
        assert_eq!(cause.describe_with_killer(), "pierced");
    }

    #[test]
    fn blunt_templates_follow_item_kind() {
        let crowbar = ItemRef {
            id: ItemId::new(),
            kind: ItemType::Crowbar,
            name: String::from("Crowbar"),
        };
        let cause = CauseOfDeath::from_stim(StimulusType::BluntDamage, &EffectSource::from_item(crowbar));
        assert_eq!(cause.describe_without_killer(), "pried apart with Crowbar");

        let bare = CauseOfDeath::from_stim(StimulusType::BluntDamage, &EffectSource::default());
        assert_eq!(bare.template, "beaten to death");
    }

    #[test]
    fn fixed_phrases_for_environmental_kinds() {
        let source = EffectSource::from_actor(killer());
        let cases = [
            (StimulusType::Fire, "burned to death"),
            (StimulusType::ExplosionDamage, "blown to pieces"),
            (StimulusType::LethalPoison, "poisoned"),
            (StimulusType::HighVoltage, "electrocuted"),
            (StimulusType::Water, UNKNOWN_CAUSE),
        ];
        for (kind, expected) in cases {
            assert_eq!(CauseOfDeath::from_stim(kind, &source).template, expected);
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let source = EffectSource::actor_with_item(killer(), knife());
        let first = CauseOfDeath::from_stim(StimulusType::PiercingDamage, &source);
        let second = CauseOfDeath::from_stim(StimulusType::PiercingDamage, &source);
        assert_eq!(first, second);
    }

    #[test]
    fn display_omits_killer() {
        let source = EffectSource::from_actor(killer());
        let cause = CauseOfDeath::from_stim(StimulusType::HighVoltage, &source);
        assert_eq!(cause.to_string(), "electrocuted");
    }
}
