//! Actors and the actor registry.
//!
//! An [`Actor`] is anyone who occupies the grid: the player, guards,
//! staff, and guests. Each actor exclusively owns its [`Inventory`] and,
//! unless it is the player, its [`AiComponent`]. References to other
//! actors (the body being dragged) are ids resolved through the
//! [`ActorManager`].
//!
//! The state transitions here are the building blocks of the engine's
//! damage handlers: [`Actor::take_damage`], [`Actor::knock_unconscious`],
//! and [`Actor::mark_dead`]. They never decide *why* something happens,
//! only keep the actor's own fields consistent.

use std::collections::BTreeMap;

use covert_types::{
    ActorId, ActorRef, ActorStatus, Direction, EffectSource, Point, StimulusType, Team,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::{AiComponent, AiState};
use crate::death::CauseOfDeath;
use crate::error::AgentError;
use crate::inventory::Inventory;
use crate::knowledge::IndividualKnowledge;

/// A worn disguise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disguise {
    /// Outfit name ("Chef", "Security Guard"); compromise is tracked by name.
    pub name: String,
    /// Team the outfit makes the wearer look like.
    pub team: Team,
}

/// One entry of an actor's damage history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRecord {
    /// Damaging stimulus kind.
    pub kind: StimulusType,
    /// Health lost.
    pub amount: i32,
    /// Tick the damage was taken.
    pub tick: u64,
    /// Who or what caused it.
    pub source: EffectSource,
}

/// Anyone on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique handle.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// True allegiance.
    pub team: Team,
    /// Whether this is the player.
    pub is_player: bool,
    /// Current tile.
    pub position: Point,
    /// Facing, used by vision cones.
    pub facing: Direction,
    /// Physical condition.
    pub status: ActorStatus,
    /// Remaining health; death at zero or below.
    pub health: i32,
    /// Disguise being worn, if any.
    pub disguise: Option<Disguise>,
    /// Carried items.
    pub inventory: Inventory,
    /// AI state; `None` for the player.
    pub ai: Option<AiComponent>,
    /// Every hit taken, oldest first.
    pub damage_history: Vec<DamageRecord>,
    /// Cause of death, set exactly once.
    pub cause_of_death: Option<CauseOfDeath>,
    /// Body being dragged, if any.
    pub dragging: Option<ActorId>,
    /// Whether the (downed) actor has been hidden in a body bag.
    pub bagged: bool,
    /// Whether the actor is visibly fighting.
    pub in_open_combat: bool,
    /// Whether the actor is visibly doing something illegal.
    pub illegal_activity: bool,
    /// Whether the body has already been reported.
    pub body_flagged: bool,
    /// Whether a burn re-check is already scheduled.
    pub fire_recheck_pending: bool,
    /// Whether the actor is sick from emetic poison.
    pub vomiting: bool,
}

impl Actor {
    /// Create an actor with no AI and no items.
    pub fn new(name: impl Into<String>, team: Team, position: Point, health: i32) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            team,
            is_player: false,
            position,
            facing: Direction::South,
            status: ActorStatus::Active,
            health,
            disguise: None,
            inventory: Inventory::new(),
            ai: None,
            damage_history: Vec::new(),
            cause_of_death: None,
            dragging: None,
            bagged: false,
            in_open_combat: false,
            illegal_activity: false,
            body_flagged: false,
            fire_recheck_pending: false,
            vomiting: false,
        }
    }

    /// Create the player.
    pub fn player(name: impl Into<String>, position: Point, health: i32) -> Self {
        let mut actor = Self::new(name, Team::Intruder, position, health);
        actor.is_player = true;
        actor
    }

    /// Attach an AI component.
    #[must_use]
    pub fn with_ai(mut self, ai: AiComponent) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Put on a disguise.
    #[must_use]
    pub fn with_disguise(mut self, name: impl Into<String>, team: Team) -> Self {
        self.disguise = Some(Disguise {
            name: name.into(),
            team,
        });
        self
    }

    /// Face a direction.
    #[must_use]
    pub const fn with_facing(mut self, facing: Direction) -> Self {
        self.facing = facing;
        self
    }

    /// Attribution snapshot.
    pub fn actor_ref(&self) -> ActorRef {
        ActorRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Whether the actor is not dead.
    pub const fn is_alive(&self) -> bool {
        !matches!(self.status, ActorStatus::Dead)
    }

    /// Whether the actor is conscious.
    pub const fn is_active(&self) -> bool {
        matches!(self.status, ActorStatus::Active)
    }

    /// Whether the actor lies on the floor.
    pub const fn is_downed(&self) -> bool {
        self.status.is_downed()
    }

    /// Whether an AI drives this actor.
    pub const fn is_ai_controlled(&self) -> bool {
        !self.is_player && self.ai.is_some()
    }

    /// Whether the actor is fighting, either visibly or per its AI state.
    pub fn is_in_combat(&self) -> bool {
        self.in_open_combat || self.ai.as_ref().is_some_and(AiComponent::is_in_combat)
    }

    /// Whether the actor takes part in perception passes.
    pub const fn perceives(&self) -> bool {
        self.is_active() && self.is_ai_controlled()
    }

    /// The team `observer` believes this actor belongs to.
    ///
    /// A disguise works on every observer that has not seen through it.
    pub fn apparent_team(&self, observer: Option<&IndividualKnowledge>) -> Team {
        match &self.disguise {
            Some(disguise) if !observer.is_some_and(|k| k.is_compromised(&disguise.name)) => {
                disguise.team
            }
            _ => self.team,
        }
    }

    /// Lose `amount` health and record the hit.
    ///
    /// Negative amounts are treated as zero, so health never increases.
    /// Returns `true` if health is now at or below zero.
    pub fn take_damage(
        &mut self,
        kind: StimulusType,
        amount: i32,
        tick: u64,
        source: EffectSource,
    ) -> bool {
        let amount = amount.max(0);
        self.health = self.health.saturating_sub(amount);
        self.damage_history.push(DamageRecord {
            kind,
            amount,
            tick,
            source,
        });
        debug!(actor = %self.id, ?kind, amount, health = self.health, "Damage taken");
        self.health <= 0
    }

    /// Knock the actor out. Returns `false` if it was not active.
    pub fn knock_unconscious(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = ActorStatus::Unconscious;
        self.in_open_combat = false;
        self.illegal_activity = false;
        self.dragging = None;
        true
    }

    /// Mark the actor dead with `cause`.
    ///
    /// Returns `false` (and changes nothing) if the actor was already dead,
    /// so a death is only ever recorded once. Resets the AI stack.
    pub fn mark_dead(&mut self, cause: CauseOfDeath) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.status = ActorStatus::Dead;
        self.health = self.health.min(0);
        self.cause_of_death = Some(cause);
        self.in_open_combat = false;
        self.illegal_activity = false;
        self.dragging = None;
        self.vomiting = false;
        self.fire_recheck_pending = false;
        if let Some(ai) = &mut self.ai {
            ai.states.set_state(AiState::Idle);
            ai.reset_suspicion();
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Owner of every actor in the level.
#[derive(Debug, Clone, Default)]
pub struct ActorManager {
    actors: BTreeMap<ActorId, Actor>,
    player: Option<ActorId>,
}

impl ActorManager {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateActor`] for a reused id, or
    /// [`AgentError::DuplicatePlayer`] for a second player.
    pub fn add(&mut self, actor: Actor) -> Result<ActorId, AgentError> {
        let id = actor.id;
        if self.actors.contains_key(&id) {
            return Err(AgentError::DuplicateActor(id));
        }
        if actor.is_player {
            if let Some(existing) = self.player {
                return Err(AgentError::DuplicatePlayer(existing));
            }
            self.player = Some(id);
        }
        self.actors.insert(id, actor);
        Ok(id)
    }

    /// Look up an actor.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Look up an actor mutably.
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Look up an actor, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ActorNotFound`].
    pub fn require(&self, id: ActorId) -> Result<&Actor, AgentError> {
        self.actors.get(&id).ok_or(AgentError::ActorNotFound(id))
    }

    /// The player's id, if registered.
    pub const fn player(&self) -> Option<ActorId> {
        self.player
    }

    /// The upright actor standing on `at`, if any.
    pub fn standing_at(&self, at: Point) -> Option<ActorId> {
        self.actors
            .values()
            .find(|a| a.position == at && !a.is_downed())
            .map(|a| a.id)
    }

    /// Actors lying on `at`.
    pub fn downed_at(&self, at: Point) -> Vec<ActorId> {
        self.actors
            .values()
            .filter(|a| a.position == at && a.is_downed())
            .map(|a| a.id)
            .collect()
    }

    /// Every actor on `at`, upright first, each listed once.
    pub fn occupants(&self, at: Point) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self.standing_at(at).into_iter().collect();
        for id in self.downed_at(at) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// All actor ids in registration order.
    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    /// All actors.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Number of actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the level is empty.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> Actor {
        Actor::new("Guard", Team::Security, Point::new(1, 1), 10)
            .with_ai(AiComponent::new(AiState::ScheduledMovement))
    }

    #[test]
    fn health_never_increases() {
        let mut a = guard();
        assert!(!a.take_damage(StimulusType::Fire, -5, 0, EffectSource::default()));
        assert_eq!(a.health, 10);
        assert!(!a.take_damage(StimulusType::Fire, 3, 1, EffectSource::default()));
        assert_eq!(a.health, 7);
        assert!(a.take_damage(StimulusType::PiercingDamage, 9, 2, EffectSource::default()));
        assert_eq!(a.damage_history.len(), 3);
    }

    #[test]
    fn death_is_recorded_once() {
        let mut a = guard();
        if let Some(ai) = a.ai.as_mut() {
            ai.states.push_state(AiState::Vomiting);
        }
        assert!(a.mark_dead(CauseOfDeath::unknown()));
        assert!(!a.mark_dead(CauseOfDeath::new("poisoned", EffectSource::default())));
        assert_eq!(
            a.cause_of_death.as_ref().map(|c| c.template.as_str()),
            Some(crate::death::UNKNOWN_CAUSE)
        );
        assert_eq!(a.ai.as_ref().map(|ai| ai.states.depth()), Some(1));
    }

    #[test]
    fn knocked_out_actor_cannot_be_knocked_out_again() {
        let mut a = guard();
        assert!(a.knock_unconscious());
        assert!(!a.knock_unconscious());
        assert!(a.is_downed());
        assert!(a.is_alive());
        assert!(!a.perceives());
    }

    #[test]
    fn disguise_fools_only_unaware_observers() {
        let player = Actor::player("47", Point::new(0, 0), 10).with_disguise("Chef", Team::Staff);
        let mut aware = IndividualKnowledge::new();
        aware.compromise_disguise("Chef");
        assert_eq!(player.apparent_team(None), Team::Staff);
        assert_eq!(player.apparent_team(Some(&IndividualKnowledge::new())), Team::Staff);
        assert_eq!(player.apparent_team(Some(&aware)), Team::Intruder);
    }

    #[test]
    fn manager_rejects_second_player() {
        let mut mgr = ActorManager::new();
        assert!(mgr.add(Actor::player("A", Point::new(0, 0), 10)).is_ok());
        let second = mgr.add(Actor::player("B", Point::new(1, 0), 10));
        assert!(matches!(second, Err(AgentError::DuplicatePlayer(_))));
    }

    #[test]
    fn occupants_split_standing_and_downed() {
        let mut mgr = ActorManager::new();
        let at = Point::new(2, 2);
        let standing = mgr.add(Actor::new("Guest", Team::Civilian, at, 10));
        let mut body = Actor::new("Victim", Team::Civilian, at, 10);
        body.mark_dead(CauseOfDeath::unknown());
        let body = mgr.add(body).ok();
        assert!(standing.is_ok() && body.is_some());

        assert_eq!(mgr.standing_at(at), standing.ok());
        assert_eq!(mgr.downed_at(at), body.into_iter().collect::<Vec<_>>());
        assert_eq!(mgr.occupants(at).len(), 2);
        assert_eq!(mgr.occupants(Point::new(9, 9)).len(), 0);
    }
}
