//! Clock, scheduler, stimulus engine, perception, and tick cycle for the
//! Covert simulation.
//!
//! A [`Level`] holds all mutable state. The stimulus engine
//! ([`engine::apply`]) turns effects into tile, actor, item, and object
//! changes; the perception pass turns what AI actors see and hear into
//! incidents and behavior states; [`run_tick`] strings it together one
//! fixed step at a time.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and millisecond game time.
//! - [`config`] -- Configuration loading from `covert-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- Stimulus application: tile, actor, item, and object rules.
//! - [`level`] -- The [`Level`] container.
//! - [`notify`] -- [`Notification`]s for presentation layers.
//! - [`perception`] -- Vision scans and event routing.
//! - [`reaction`] -- AI escalation from perceptions to behavior states.
//! - [`scheduler`] -- Deadline-ordered [`Scheduler`] of deferred commands.
//! - [`stats`] -- [`MissionStats`] for the after-action report.
//! - [`tick`] -- The tick cycle and bounded runner.
//! - [`vision`] -- The [`Vision`] collaborator and [`RadiusVision`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod level;
pub mod notify;
pub mod perception;
pub mod reaction;
pub mod scheduler;
pub mod stats;
pub mod tick;
pub mod vision;

pub use clock::{ClockError, SimClock, seconds_to_ms};
pub use config::{
    ConfigError, LoggingConfig, PerceptionConfig, SimulationConfig, StimulusConfig, WorldConfig,
};
pub use level::{Level, LevelError};
pub use notify::{LogSink, NoOpSink, Notification, NotificationSink};
pub use perception::Perceived;
pub use scheduler::{Command, Scheduler};
pub use stats::{KillRecord, MissionStats};
pub use tick::{NoOpCallback, RunResult, TickCallback, TickError, TickSummary, run_for, run_tick};
pub use vision::{RadiusVision, Vision};
