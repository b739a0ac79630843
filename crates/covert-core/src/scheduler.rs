//! Delay scheduler.
//!
//! Deferred work is queued as plain command values keyed by
//! `(due_ms, sequence)`. Earlier deadlines fire first; commands due at the
//! same millisecond fire in registration order. There is no cancellation:
//! whoever executes a command re-checks that its preconditions still hold.

use std::collections::BTreeMap;

use covert_types::{ActorId, EffectSource, Point, StimEffect, StimulusType};

/// Work the stimulus engine defers to a later instant.
///
/// Payload-heavy variants box their source so the enum stays small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply `effect` at `location`.
    ApplyEffect {
        /// Target tile.
        location: Point,
        /// Attribution.
        source: Box<EffectSource>,
        /// Effect to apply.
        effect: StimEffect,
    },
    /// Kill an actor (delayed poison).
    KillActor {
        /// Victim.
        actor: ActorId,
        /// Lethal stimulus kind.
        kind: StimulusType,
        /// Attribution.
        source: Box<EffectSource>,
    },
    /// Start vomiting (emetic poison).
    StartVomiting {
        /// The poisoned actor.
        actor: ActorId,
    },
    /// Stop vomiting.
    StopVomiting {
        /// The recovering actor.
        actor: ActorId,
    },
    /// Burn again if still standing in fire.
    FireRecheck {
        /// The burning actor.
        actor: ActorId,
        /// Attribution of the original burn.
        source: Box<EffectSource>,
    },
}

/// Deadline-ordered queue of deferred commands.
#[derive(Debug, Clone)]
pub struct Scheduler<C> {
    queue: BTreeMap<(u64, u64), C>,
    next_seq: u64,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<C> Scheduler<C> {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `command` to fire at `due_ms`.
    pub fn schedule_at(&mut self, due_ms: u64, command: C) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.queue.insert((due_ms, seq), command);
    }

    /// Remove and return the earliest command due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<C> {
        let (&key, _) = self.queue.first_key_value()?;
        if key.0 > now_ms {
            return None;
        }
        self.queue.remove(&key)
    }

    /// Remove and return every command due at or before `now_ms`, in
    /// firing order.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<C> {
        let mut due = Vec::new();
        while let Some(command) = self.pop_due(now_ms) {
            due.push(command);
        }
        due
    }

    /// Deadline of the next command, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.first_key_value().map(|(&(due, _), _)| due)
    }

    /// Queued commands, in firing order, with their deadlines.
    pub fn pending(&self) -> impl Iterator<Item = (u64, &C)> {
        self.queue.iter().map(|(&(due, _), c)| (due, c))
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_deadlines_fire_first() {
        let mut s = Scheduler::new();
        s.schedule_at(300, "late");
        s.schedule_at(100, "early");
        s.schedule_at(200, "middle");
        assert_eq!(s.drain_due(1000), vec!["early", "middle", "late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn same_instant_fires_in_registration_order() {
        let mut s = Scheduler::new();
        for n in 0..5 {
            s.schedule_at(500, n);
        }
        assert_eq!(s.drain_due(500), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn future_commands_wait() {
        let mut s = Scheduler::new();
        s.schedule_at(100, 'a');
        s.schedule_at(250, 'b');
        assert_eq!(s.pop_due(99), None);
        assert_eq!(s.drain_due(200), vec!['a']);
        assert_eq!(s.next_due(), Some(250));
        assert_eq!(s.len(), 1);
    }
}
