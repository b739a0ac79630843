//! Notifications for presentation collaborators.
//!
//! The engine never waits on animation, audio, or the HUD. It announces
//! decisions it has already made by pushing a [`Notification`] to the
//! level's outbox; the tick driver drains the outbox into its summary,
//! and a [`NotificationSink`] forwards them wherever they need to go.

use covert_types::{ActorId, ObjectId, Point, SpeechCode, StimulusType};
use serde::Serialize;
use tracing::info;

/// Something presentation layers may want to show or play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Notification {
    /// Electricity arcs over these tiles.
    Electricity {
        /// Electrified tiles.
        tiles: Vec<Point>,
    },
    /// A distributed effect spreads ring by ring.
    Distribution {
        /// Where it started.
        origin: Point,
        /// Tiles per ring, origin first.
        rings: Vec<Vec<Point>>,
    },
    /// An actor took damage.
    Damage {
        /// The victim.
        actor: ActorId,
        /// Damaging stimulus kind.
        kind: StimulusType,
        /// Health lost.
        amount: i32,
    },
    /// The player's health or status changed.
    HudRefresh,
    /// An actor died.
    Death {
        /// The victim.
        actor: ActorId,
        /// Victim's name.
        name: String,
        /// Cause, without naming the killer.
        cause: String,
    },
    /// An actor heard someone speak.
    SpeechHeard {
        /// Who heard it.
        listener: ActorId,
        /// What was said.
        code: SpeechCode,
        /// Where it was said.
        origin: Point,
    },
    /// A door was forced open.
    DoorOpened {
        /// The door.
        object: ObjectId,
        /// Its tile.
        at: Point,
    },
    /// An object broke.
    ObjectBroken {
        /// The object.
        object: ObjectId,
        /// Its tile.
        at: Point,
    },
    /// An actor started or stopped vomiting.
    Vomiting {
        /// The actor.
        actor: ActorId,
        /// `true` on start, `false` on recovery.
        started: bool,
    },
    /// The player was seen doing something dangerous.
    BeenSpotted {
        /// Who saw it.
        by: ActorId,
    },
}

/// Consumer of notifications.
pub trait NotificationSink {
    /// Handle one notification.
    fn notify(&mut self, notification: &Notification);
}

/// Sink that logs every notification through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink {
    forwarded: u64,
}

impl LogSink {
    /// New sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications forwarded so far.
    pub const fn forwarded(&self) -> u64 {
        self.forwarded
    }
}

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: &Notification) {
        self.forwarded = self.forwarded.saturating_add(1);
        match notification {
            Notification::Death { name, cause, .. } => info!(%name, %cause, "Death"),
            Notification::DoorOpened { at, .. } => info!(%at, "Door opened"),
            Notification::ObjectBroken { at, .. } => info!(%at, "Object broken"),
            Notification::Electricity { tiles } => info!(tiles = tiles.len(), "Electricity"),
            Notification::BeenSpotted { by } => info!(%by, "Player spotted"),
            other => tracing::debug!(notification = ?other, "Notification"),
        }
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl NotificationSink for NoOpSink {
    fn notify(&mut self, _notification: &Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sink_counts_forwarded() {
        let mut sink = LogSink::new();
        sink.notify(&Notification::HudRefresh);
        sink.notify(&Notification::Electricity {
            tiles: vec![Point::new(0, 0)],
        });
        assert_eq!(sink.forwarded(), 2);
    }

    #[test]
    fn notifications_serialize() {
        let json = serde_json::to_string(&Notification::HudRefresh);
        assert!(json.is_ok_and(|s| s.contains("HudRefresh")));
    }
}
