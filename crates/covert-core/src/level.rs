//! The level: every piece of mutable simulation state in one place.
//!
//! A [`Level`] owns the tile map, the actor/item/object registries, the
//! shared incident registry, the delay scheduler, mission statistics, and
//! the notification outbox. The stimulus engine, perception, and the tick
//! driver are free functions over `&mut Level`; there is no global state.

use covert_agents::{
    Actor, ActorManager, AgentError, Disguise, IncidentRegistry, Item, ItemStore, ObjectKind,
    ObjectStore, WorldObject,
};
use covert_types::{ActorId, IncidentId, ItemId, ObjectId, Observation, Point, Team};
use covert_world::{TileMap, WorldError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::clock::{ClockError, SimClock, seconds_to_ms};
use crate::config::SimulationConfig;
use crate::notify::Notification;
use crate::scheduler::{Command, Scheduler};
use crate::stats::MissionStats;
use crate::vision::{RadiusVision, Vision};

/// Errors that can occur while building or editing a level.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// The clock could not be built from the configuration.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Registry bookkeeping failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The tile map rejected an edit.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Something was placed outside the map.
    #[error("position {0} is outside the map")]
    OutOfBounds(Point),
}

/// All state of one running level.
#[derive(Debug)]
pub struct Level {
    /// Configuration the level was built with.
    pub config: SimulationConfig,
    /// Simulation clock.
    pub clock: SimClock,
    /// Tile grid with per-tile stimuli.
    pub map: TileMap,
    /// Every actor, player included.
    pub actors: ActorManager,
    /// Items lying on the floor.
    pub items: ItemStore,
    /// Doors, pipes, radios, fuse boxes.
    pub objects: ObjectStore,
    /// Incidents shared by all actors.
    pub incidents: IncidentRegistry,
    /// Deferred commands.
    pub scheduler: Scheduler<Command>,
    /// After-action statistics.
    pub stats: MissionStats,
    vision: Box<dyn Vision>,
    rng: SmallRng,
    outbox: Vec<Notification>,
}

impl Level {
    /// Build an empty level over `map`.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Clock`] if `seconds_per_tick` rounds to zero
    /// milliseconds.
    pub fn new(map: TileMap, config: SimulationConfig) -> Result<Self, LevelError> {
        let clock = SimClock::new(config.world.seconds_per_tick)?;
        let rng = SmallRng::seed_from_u64(config.world.seed);
        let vision = Box::new(RadiusVision::new(config.perception.vision_range));
        info!(
            name = %config.world.name,
            width = map.width(),
            height = map.height(),
            seed = config.world.seed,
            "Level created"
        );
        Ok(Self {
            config,
            clock,
            map,
            actors: ActorManager::new(),
            items: ItemStore::new(),
            objects: ObjectStore::new(),
            incidents: IncidentRegistry::new(),
            scheduler: Scheduler::new(),
            stats: MissionStats::new(),
            vision,
            rng,
            outbox: Vec::new(),
        })
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Current simulation time in milliseconds.
    pub const fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Queue `command` to run `delay_seconds` from now.
    pub fn schedule(&mut self, delay_seconds: f64, command: Command) {
        self.schedule_ms(seconds_to_ms(delay_seconds), command);
    }

    /// Queue `command` to run `delay_ms` milliseconds from now.
    pub fn schedule_ms(&mut self, delay_ms: u64, command: Command) {
        let due = self.now_ms().saturating_add(delay_ms);
        debug!(due, ?command, "Command scheduled");
        self.scheduler.schedule_at(due, command);
    }

    /// A uniformly random delay in `[0, max_seconds)`, in milliseconds.
    pub fn random_delay_ms(&mut self, max_seconds: f64) -> u64 {
        let max_ms = seconds_to_ms(max_seconds);
        if max_ms == 0 {
            return 0;
        }
        self.rng.random_range(0..max_ms)
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Push a notification to the outbox.
    pub fn notify(&mut self, notification: Notification) {
        self.outbox.push(notification);
    }

    /// Take every pending notification.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    /// Notifications not yet drained.
    pub fn pending_notifications(&self) -> &[Notification] {
        &self.outbox
    }

    // -----------------------------------------------------------------------
    // Vision
    // -----------------------------------------------------------------------

    /// The vision collaborator.
    pub fn vision(&self) -> &dyn Vision {
        self.vision.as_ref()
    }

    /// Replace the vision collaborator.
    pub fn set_vision(&mut self, vision: Box<dyn Vision>) {
        self.vision = vision;
    }

    // -----------------------------------------------------------------------
    // Population
    // -----------------------------------------------------------------------

    /// Add an actor.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::OutOfBounds`] if the actor stands outside the
    /// map, or [`LevelError::Agent`] for duplicate ids or a second player.
    pub fn add_actor(&mut self, actor: Actor) -> Result<ActorId, LevelError> {
        if !self.map.contains(actor.position) {
            return Err(LevelError::OutOfBounds(actor.position));
        }
        let worn = actor
            .disguise
            .as_ref()
            .filter(|_| actor.is_player)
            .map(|d| d.name.clone());
        let id = self.actors.add(actor)?;
        if let Some(name) = worn {
            self.stats.record_disguise(&name);
        }
        Ok(id)
    }

    /// Drop an item on the floor.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::OutOfBounds`] if `at` is outside the map.
    pub fn place_item(&mut self, item: Item, at: Point) -> Result<ItemId, LevelError> {
        if !self.map.contains(at) {
            return Err(LevelError::OutOfBounds(at));
        }
        Ok(self.items.place(item, at))
    }

    /// Add a world object. A closed door blocks its tile.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::OutOfBounds`] if the object is outside the
    /// map, or [`LevelError::Agent`] for a duplicate id.
    pub fn add_object(&mut self, object: WorldObject) -> Result<ObjectId, LevelError> {
        let at = object.position;
        if !self.map.contains(at) {
            return Err(LevelError::OutOfBounds(at));
        }
        let blocks = matches!(object.kind, ObjectKind::Door { open: false, .. });
        let id = self.objects.add(object)?;
        if blocks {
            self.map.set_walkable(at, false)?;
        }
        Ok(id)
    }

    /// Put `item` into an actor's inventory.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Agent`] if the actor does not exist.
    pub fn give_item(&mut self, actor: ActorId, item: Item) -> Result<ItemId, LevelError> {
        let holder = self
            .actors
            .get_mut(actor)
            .ok_or(AgentError::ActorNotFound(actor))?;
        Ok(holder.inventory.add(actor, item))
    }

    /// Equip a carried item.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Agent`] if the actor does not exist or does
    /// not carry the item.
    pub fn equip(&mut self, actor: ActorId, item: ItemId) -> Result<(), LevelError> {
        let holder = self
            .actors
            .get_mut(actor)
            .ok_or(AgentError::ActorNotFound(actor))?;
        holder.inventory.equip(actor, item)?;
        Ok(())
    }

    /// Put on (or take off, with `None`) a disguise.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Agent`] if the actor does not exist.
    pub fn set_disguise(
        &mut self,
        actor: ActorId,
        disguise: Option<(&str, Team)>,
    ) -> Result<(), LevelError> {
        let target = self
            .actors
            .get_mut(actor)
            .ok_or(AgentError::ActorNotFound(actor))?;
        target.disguise = disguise.map(|(name, team)| Disguise {
            name: name.to_owned(),
            team,
        });
        if target.is_player {
            if let Some((name, _)) = disguise {
                self.stats.record_disguise(name);
            }
        }
        Ok(())
    }

    /// Destroy an item wherever it is.
    ///
    /// Floor items are flagged destroyed and stop reacting; carried items
    /// are removed from their holder's inventory. Returns `false` if the
    /// item was not found.
    pub fn destroy_item(&mut self, id: ItemId) -> bool {
        if let Some(item) = self.items.get_mut(id) {
            item.destroyed = true;
            debug!(item = %id, "Floor item destroyed");
            return true;
        }
        let holder = self
            .actors
            .iter()
            .find(|a| a.inventory.get(id).is_some())
            .map(|a| a.id);
        let Some(holder) = holder else {
            return false;
        };
        let removed = self
            .actors
            .get_mut(holder)
            .and_then(|a| a.inventory.remove(id))
            .is_some();
        if removed {
            debug!(item = %id, actor = %holder, "Carried item destroyed");
        }
        removed
    }

    /// Mark an incident handled.
    ///
    /// A handled body stays discovered: it will not be reported again.
    /// Returns `false` if the incident does not exist.
    pub fn finish_incident(&mut self, id: IncidentId) -> bool {
        let Some(report) = self.incidents.get(id) else {
            return false;
        };
        let (observation, location) = (report.observation, report.location);
        if observation == Observation::BodyFound {
            for body in self.actors.downed_at(location) {
                if let Some(actor) = self.actors.get_mut(body) {
                    actor.body_flagged = true;
                }
            }
        }
        self.incidents.finish(id)
    }
}
