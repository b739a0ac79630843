//! Observations and their classifications.
//!
//! An [`Observation`] tags what an actor noticed. Every classification is a
//! pure function of the tag; none of them look at world state.

use serde::{Deserialize, Serialize};

/// Dialogue codes carried by speech observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpeechCode {
    /// Small talk.
    Greeting,
    /// "Stop right there!"
    Halt,
    /// Shouted alarm to nearby guards.
    Alarm,
    /// Call for help.
    CallForHelp,
    /// Radio chatter between guards.
    RadioCheck,
}

/// What an actor observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Observation {
    // --- Momentary events ---
    /// A gun was fired.
    Gunshot,
    /// Something blew up.
    Explosion,
    /// Someone screamed.
    Scream,
    /// A noise of unknown origin (thrown coin, breaking object).
    Distraction,
    /// A fight was witnessed.
    CombatSeen,
    /// Someone was seen dying.
    Death,
    /// Someone was seen doing something illegal.
    IllegalAction,
    /// Someone was seen doing something odd.
    SuspiciousAction,
    /// Someone was heard speaking.
    Speech(SpeechCode),
    /// A friendly actor made contact.
    ContactFriendly,
    /// A hostile actor made contact.
    ContactHostile,

    // --- Persistent states ---
    /// A body lies here.
    BodyFound,
    /// A weapon lies where it should not.
    WeaponFound,
    /// There is blood here.
    BloodFound,
    /// Someone is where they should not be.
    Trespassing,
    /// Someone is in a guarded area.
    TrespassingHostile,
    /// Someone is openly carrying an illegal item.
    IllegalItem,
    /// Someone is dragging a body.
    DraggingBody,
    /// Someone wears a disguise that has been seen through.
    DisguiseCompromised,
}

impl Observation {
    /// Momentary event, as opposed to a state that persists until handled.
    pub const fn is_an_event(self) -> bool {
        matches!(
            self,
            Self::Gunshot
                | Self::Explosion
                | Self::Scream
                | Self::Distraction
                | Self::CombatSeen
                | Self::Death
                | Self::IllegalAction
                | Self::SuspiciousAction
                | Self::Speech(_)
                | Self::ContactFriendly
                | Self::ContactHostile
        )
    }

    /// The location is dangerous: observers should treat it as a threat.
    pub const fn is_dangerous_location(self) -> bool {
        matches!(
            self,
            Self::Gunshot | Self::Explosion | Self::CombatSeen | Self::Death | Self::BodyFound
        )
    }

    /// The location warrants an investigation.
    pub const fn is_suspicious_location(self) -> bool {
        matches!(
            self,
            Self::Scream
                | Self::Distraction
                | Self::SuspiciousAction
                | Self::WeaponFound
                | Self::BloodFound
        )
    }

    /// The observation concerns a suspicious (not yet dangerous) actor.
    pub const fn is_suspicious_actor(self) -> bool {
        matches!(
            self,
            Self::Trespassing
                | Self::TrespassingHostile
                | Self::IllegalItem
                | Self::IllegalAction
                | Self::SuspiciousAction
        )
    }

    /// Something is left behind that staff should clean up.
    pub const fn needs_cleanup(self) -> bool {
        matches!(self, Self::BodyFound | Self::WeaponFound | Self::BloodFound)
    }

    /// The observation is evidence of a crime.
    pub const fn is_illegal(self) -> bool {
        matches!(
            self,
            Self::Gunshot
                | Self::Explosion
                | Self::CombatSeen
                | Self::Death
                | Self::IllegalAction
                | Self::IllegalItem
                | Self::TrespassingHostile
                | Self::DraggingBody
                | Self::DisguiseCompromised
        )
    }

    /// Actor-to-actor contact.
    pub const fn is_contact(self) -> bool {
        matches!(self, Self::ContactFriendly | Self::ContactHostile)
    }

    /// Dialogue rather than a noise.
    pub const fn is_speech(self) -> bool {
        matches!(self, Self::Speech(_))
    }
}
