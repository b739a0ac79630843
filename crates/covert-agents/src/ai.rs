//! AI component and behavior-state stack.
//!
//! Each AI-controlled actor owns one [`AiComponent`]: its private
//! knowledge, its patrol schedule, the stack of behavior states, and a
//! suspicion counter. The stack nests sub-behaviors on top of a root
//! behavior (investigating pushed on top of scheduled movement) and can
//! never become empty.
//!
//! This module only decides which state an actor is in. How each state
//! moves the actor is the pathing layer's business.

use covert_types::{ActorId, IncidentId, Point};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::knowledge::IndividualKnowledge;

/// Highest value of the suspicion counter.
pub const MAX_SUSPICION: u8 = 3;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// A behavior mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// Standing around.
    Idle,
    /// Following the patrol schedule.
    ScheduledMovement,
    /// Walking to an incident to look at it.
    Investigating {
        /// The incident under investigation.
        incident: IncidentId,
        /// Where it happened.
        location: Point,
    },
    /// Searching an area for a culprit.
    Searching {
        /// Center of the search.
        location: Point,
    },
    /// Cleaning up a body, weapon or blood.
    Cleaning {
        /// The incident being cleaned up.
        incident: IncidentId,
    },
    /// Running to tell security.
    Reporting {
        /// The incident being reported.
        incident: IncidentId,
    },
    /// Confronting a suspicious actor.
    Engaged {
        /// The actor being confronted.
        target: ActorId,
    },
    /// Fighting.
    Combat {
        /// The actor being fought, if known.
        target: Option<ActorId>,
    },
    /// Running away.
    Fleeing {
        /// The danger being fled from.
        from: Point,
    },
    /// Sick from emetic poison.
    Vomiting,
}

/// A non-empty stack of behavior states.
///
/// `root` is the bottom entry and always present; `stack` holds the
/// nested entries above it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiStateStack {
    root: AiState,
    stack: Vec<AiState>,
}

impl AiStateStack {
    /// A stack holding only `root`.
    pub const fn new(root: AiState) -> Self {
        Self {
            root,
            stack: Vec::new(),
        }
    }

    /// The active (topmost) state.
    pub fn current(&self) -> AiState {
        self.stack.last().copied().unwrap_or(self.root)
    }

    /// The bottom state.
    pub const fn root(&self) -> AiState {
        self.root
    }

    /// Number of states, root included. Never zero.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_add(1)
    }

    /// Replace the whole stack with `state`.
    pub fn set_state(&mut self, state: AiState) {
        self.stack.clear();
        self.root = state;
    }

    /// Nest `state` on top of the current one.
    pub fn push_state(&mut self, state: AiState) {
        self.stack.push(state);
    }

    /// Leave the current state, returning it.
    ///
    /// Popping the root is rejected: a warning is logged and `None`
    /// returned, leaving the stack unchanged.
    pub fn pop_state(&mut self) -> Option<AiState> {
        let popped = self.stack.pop();
        if popped.is_none() {
            warn!(root = ?self.root, "Refusing to pop the last AI state");
        }
        popped
    }

    /// Swap the current state for `state`.
    pub fn replace_state(&mut self, state: AiState) {
        match self.stack.last_mut() {
            Some(top) => *top = state,
            None => self.root = state,
        }
    }

    /// Whether any state on the stack satisfies `predicate`.
    pub fn contains(&self, predicate: impl Fn(&AiState) -> bool) -> bool {
        predicate(&self.root) || self.stack.iter().any(predicate)
    }

    /// All states, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &AiState> {
        std::iter::once(&self.root).chain(self.stack.iter())
    }
}

// ---------------------------------------------------------------------------
// Schedule, movement, update cadence
// ---------------------------------------------------------------------------

/// One stop on a patrol route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Where to go.
    pub location: Point,
    /// How long to linger there, in seconds.
    pub wait_seconds: f64,
}

/// An ordered, looping list of tasks with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    tasks: Vec<ScheduledTask>,
    cursor: usize,
}

impl Schedule {
    /// A schedule over `tasks`, starting at the first.
    pub const fn new(tasks: Vec<ScheduledTask>) -> Self {
        Self { tasks, cursor: 0 }
    }

    /// The task the actor is working on.
    pub fn current(&self) -> Option<&ScheduledTask> {
        self.tasks.get(self.cursor)
    }

    /// Move on to the next task, wrapping around at the end.
    pub fn advance(&mut self) -> Option<&ScheduledTask> {
        if self.tasks.is_empty() {
            return None;
        }
        self.cursor = self
            .cursor
            .saturating_add(1)
            .checked_rem(self.tasks.len())
            .unwrap_or(0);
        self.tasks.get(self.cursor)
    }

    /// Index of the current task.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether there are no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// How the pathing layer should move the actor when it is not busy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStrategy {
    /// Stay put.
    #[default]
    Stationary,
    /// Walk the schedule.
    Patrol,
    /// Roam randomly.
    Wander,
    /// Stick close to another actor.
    Follow(ActorId),
}

/// Which ticks the actor perceives and re-evaluates on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdatePredicate {
    /// Every tick.
    #[default]
    Always,
    /// Every `n`th tick (ticks divisible by `n`).
    EveryNthTick(u64),
    /// Never (scripted or frozen actors).
    Never,
}

impl UpdatePredicate {
    /// Whether the actor should update on `tick`.
    pub const fn should_update(self, tick: u64) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::EveryNthTick(n) => matches!(tick.checked_rem(n), Some(0)),
        }
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Everything that makes an actor AI-controlled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiComponent {
    /// Private knowledge.
    pub knowledge: IndividualKnowledge,
    /// Patrol schedule.
    pub schedule: Schedule,
    /// Behavior-state stack.
    pub states: AiStateStack,
    /// Movement when not busy.
    pub movement: MovementStrategy,
    /// Perception cadence.
    pub update_predicate: UpdatePredicate,
    suspicion: u8,
}

impl AiComponent {
    /// A component rooted in `root` with no schedule.
    pub fn new(root: AiState) -> Self {
        Self {
            knowledge: IndividualKnowledge::new(),
            schedule: Schedule::default(),
            states: AiStateStack::new(root),
            movement: MovementStrategy::default(),
            update_predicate: UpdatePredicate::default(),
            suspicion: 0,
        }
    }

    /// A patrolling component walking `tasks`.
    pub fn patrolling(tasks: Vec<ScheduledTask>) -> Self {
        let mut ai = Self::new(AiState::ScheduledMovement);
        ai.schedule = Schedule::new(tasks);
        ai.movement = MovementStrategy::Patrol;
        ai
    }

    /// Current suspicion, `0..=MAX_SUSPICION`.
    pub const fn suspicion(&self) -> u8 {
        self.suspicion
    }

    /// Raise suspicion by one, capped at `max`. Returns the new value.
    pub fn raise_suspicion(&mut self, max: u8) -> u8 {
        self.suspicion = self.suspicion.saturating_add(1).min(max.min(MAX_SUSPICION));
        self.suspicion
    }

    /// Jump straight to `max`.
    pub fn max_suspicion(&mut self, max: u8) {
        self.suspicion = max.min(MAX_SUSPICION);
    }

    /// Calm down.
    pub const fn reset_suspicion(&mut self) {
        self.suspicion = 0;
    }

    /// Whether the current state is combat.
    pub fn is_in_combat(&self) -> bool {
        matches!(self.states.current(), AiState::Combat { .. })
    }

    /// Whether the actor is already busy with incident `id`.
    pub fn is_handling(&self, id: IncidentId) -> bool {
        self.states.contains(|s| {
            matches!(
                *s,
                AiState::Investigating { incident, .. }
                    | AiState::Cleaning { incident }
                    | AiState::Reporting { incident }
                    if incident == id
            )
        })
    }
}
