//! Enumeration types for the Covert simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stimulus Types
// ---------------------------------------------------------------------------

/// The kind of an environmental stimulus.
///
/// Persistent kinds are recorded on tiles and stay there until another
/// stimulus removes them (water clears fire and burnable liquid). Transient
/// kinds only affect whatever occupies the tile at the moment of
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StimulusType {
    // --- Persistent ---
    /// Open flame.
    Fire,
    /// Standing water. Conducts electricity, extinguishes fire.
    Water,
    /// Oil, fuel or alcohol. Carries fire between tiles.
    BurnableLiquid,
    /// Blood pool left by a wounded or killed actor.
    Blood,
    /// Live electric current.
    HighVoltage,

    // --- Transient ---
    /// Poison that kills after a delay.
    LethalPoison,
    /// Poison that makes the victim vomit after a delay.
    EmeticPoison,
    /// Bullets, blades, screwdrivers.
    PiercingDamage,
    /// Clubs, crowbars, falling objects.
    BluntDamage,
    /// Blast wave.
    ExplosionDamage,
    /// Sedatives and chloroform.
    InducedSleep,
}

impl StimulusType {
    /// Whether this stimulus is recorded on the tile it is applied to.
    pub const fn is_persistent(self) -> bool {
        matches!(
            self,
            Self::Fire | Self::Water | Self::BurnableLiquid | Self::Blood | Self::HighVoltage
        )
    }

    /// Whether this stimulus is physical damage. Distractors and triggers
    /// break under any of these.
    pub const fn is_damage(self) -> bool {
        matches!(
            self,
            Self::PiercingDamage | Self::BluntDamage | Self::ExplosionDamage | Self::Fire
        )
    }
}

// ---------------------------------------------------------------------------
// Item Types
// ---------------------------------------------------------------------------

/// The kind of an item. Drives cause-of-death phrasing and legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemType {
    // --- Firearms ---
    /// Long-range rifle.
    SniperRifle,
    /// Automatic rifle.
    AssaultRifle,
    /// Handgun.
    Pistol,
    /// Scattergun.
    Shotgun,
    /// Submachine gun.
    Smg,

    // --- Melee ---
    /// Sword, machete, cleaver.
    MeleeSharp,
    /// Baton, bat, hammer.
    MeleeBlunt,
    /// Kitchen or combat knife.
    Knife,
    /// Screwdriver.
    Screwdriver,
    /// Crowbar.
    Crowbar,
    /// Wrench.
    Wrench,

    // --- Consumables and gadgets ---
    /// Vial of lethal poison.
    LethalPoisonVial,
    /// Vial of emetic poison.
    EmeticPoisonVial,
    /// Sedative syringe.
    Sedative,
    /// Remote or timed explosive.
    Explosive,
    /// Canister of fuel.
    FuelCan,
    /// Coin or other throwable distraction.
    Coin,
    /// Keycard or key.
    Key,
    /// Anything else.
    Generic,
}

impl ItemType {
    /// Whether this item counts as a weapon for "weapon found" incidents.
    pub const fn is_weapon(self) -> bool {
        matches!(
            self,
            Self::SniperRifle
                | Self::AssaultRifle
                | Self::Pistol
                | Self::Shotgun
                | Self::Smg
                | Self::MeleeSharp
                | Self::MeleeBlunt
                | Self::Knife
                | Self::Explosive
        )
    }

    /// Whether this is a firearm.
    pub const fn is_firearm(self) -> bool {
        matches!(
            self,
            Self::SniperRifle | Self::AssaultRifle | Self::Pistol | Self::Shotgun | Self::Smg
        )
    }
}

// ---------------------------------------------------------------------------
// Teams and zones
// ---------------------------------------------------------------------------

/// Allegiance of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The player and any accomplices.
    Intruder,
    /// Guards and bodyguards.
    Security,
    /// Cooks, cleaners, maintenance.
    Staff,
    /// Guests and bystanders, including most targets.
    Civilian,
}

impl Team {
    /// Whether `self` treats `other` as a friend.
    ///
    /// Everyone on the premises is allied with everyone else except
    /// intruders, who are only allied with each other.
    pub const fn is_allied_with(self, other: Self) -> bool {
        match (self, other) {
            (Self::Intruder, Self::Intruder) => true,
            (Self::Intruder, _) | (_, Self::Intruder) => false,
            _ => true,
        }
    }

    /// Whether members of this team may be in `zone` without trespassing.
    pub const fn is_authorized_in(self, zone: Zone) -> bool {
        match zone {
            Zone::Public => true,
            Zone::Restricted => matches!(self, Self::Security | Self::Staff),
            Zone::Hostile => matches!(self, Self::Security),
        }
    }
}

/// Access classification of a tile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Zone {
    /// Open to everyone.
    #[default]
    Public,
    /// Staff-only areas.
    Restricted,
    /// Guarded areas where intruders are engaged on sight.
    Hostile,
}

// ---------------------------------------------------------------------------
// Actor status
// ---------------------------------------------------------------------------

/// Physical condition of an actor.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ActorStatus {
    /// Conscious and able to act.
    #[default]
    Active,
    /// Knocked out; lies on the floor.
    Unconscious,
    /// Dead; lies on the floor.
    Dead,
}

impl ActorStatus {
    /// Whether the actor lies on the floor (unconscious or dead).
    pub const fn is_downed(self) -> bool {
        matches!(self, Self::Unconscious | Self::Dead)
    }
}
