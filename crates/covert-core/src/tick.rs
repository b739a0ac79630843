//! Tick cycle: the fixed-step loop that drives a level.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance simulation time by one tick.
//! 2. **Commands** -- fire every scheduled command that is now due, in
//!    deadline order. Commands scheduled for "now" by other commands fire
//!    in the same tick.
//! 3. **Perception** -- every AI actor scans what it can see and escalates.
//! 4. **Notify** -- drain the notification outbox into the [`TickSummary`].
//!
//! Given the same level, configuration, and seed, the tick cycle is
//! deterministic.

use covert_types::ActorId;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::ClockError;
use crate::engine;
use crate::level::Level;
use crate::notify::Notification;
use crate::perception;

/// Upper bound on commands fired in a single tick.
///
/// Guards the loop against a cascade that keeps scheduling work for the
/// current instant.
pub const MAX_COMMANDS_PER_TICK: usize = 10_000;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulation time at the end of the tick, in milliseconds.
    pub time_ms: u64,
    /// Scheduled commands fired this tick.
    pub commands_executed: usize,
    /// Perceptions made in the perception pass.
    pub perceptions: usize,
    /// Actors who died this tick.
    pub deaths: Vec<ActorId>,
    /// Notifications raised this tick.
    pub notifications: Vec<Notification>,
}

/// Run one tick.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter overflows.
pub fn run_tick(level: &mut Level) -> Result<TickSummary, TickError> {
    let tick = level.clock.advance()?;
    let now = level.now_ms();

    let mut commands_executed: usize = 0;
    while let Some(command) = level.scheduler.pop_due(now) {
        engine::execute(level, command);
        commands_executed = commands_executed.saturating_add(1);
        if commands_executed >= MAX_COMMANDS_PER_TICK {
            warn!(
                tick,
                remaining = level.scheduler.len(),
                "Command limit reached, deferring the rest to the next tick"
            );
            break;
        }
    }

    let perceptions = perception::perception_pass(level);

    let notifications = level.drain_notifications();
    let deaths: Vec<ActorId> = notifications
        .iter()
        .filter_map(|n| match n {
            Notification::Death { actor, .. } => Some(*actor),
            _ => None,
        })
        .collect();

    debug!(
        tick,
        time_ms = now,
        commands_executed,
        perceptions,
        deaths = deaths.len(),
        pending = level.scheduler.len(),
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        time_ms: now,
        commands_executed,
        perceptions,
        deaths,
        notifications,
    })
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Callback invoked after each tick completes.
///
/// Implementations forward notifications to presentation layers, collect
/// statistics, and so on.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, level: &Level);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _level: &Level) {}
}

/// Result of a bounded run.
#[derive(Debug)]
pub struct RunResult {
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Total deaths over the run.
    pub total_deaths: usize,
}

/// Run `ticks` ticks, calling `callback` after each.
///
/// # Errors
///
/// Returns [`TickError`] if a tick fails.
pub fn run_for(
    level: &mut Level,
    ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<RunResult, TickError> {
    info!(ticks, start_tick = level.tick(), "Run starting");

    let mut final_summary = None;
    let mut total_ticks: u64 = 0;
    let mut total_deaths: usize = 0;

    for _ in 0..ticks {
        let summary = run_tick(level)?;
        total_ticks = total_ticks.saturating_add(1);
        total_deaths = total_deaths.saturating_add(summary.deaths.len());
        callback.on_tick(&summary, level);
        final_summary = Some(summary);
    }

    info!(
        total_ticks,
        total_deaths,
        final_tick = level.tick(),
        pending_commands = level.scheduler.len(),
        "Run ended"
    );

    Ok(RunResult {
        final_summary,
        total_ticks,
        total_deaths,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use covert_agents::Actor;
    use covert_types::{EffectSource, Point, StimulusType, Team};
    use covert_world::TileMap;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::scheduler::Command;

    fn level() -> Level {
        let map = TileMap::new(4, 4).expect("4x4 map");
        Level::new(map, SimulationConfig::default()).expect("level")
    }

    #[test]
    fn tick_fires_due_commands_only() {
        let mut level = level();
        let victim = level
            .add_actor(Actor::new("Guest", Team::Civilian, Point::new(1, 1), 10))
            .expect("victim");
        level.schedule(
            0.25,
            Command::KillActor {
                actor: victim,
                kind: StimulusType::LethalPoison,
                source: Box::new(EffectSource::default()),
            },
        );

        let first = run_tick(&mut level).expect("tick 1");
        let second = run_tick(&mut level).expect("tick 2");
        assert_eq!(first.commands_executed, 0);
        assert_eq!(second.commands_executed, 0);

        let third = run_tick(&mut level).expect("tick 3");
        assert_eq!(third.tick, 3);
        assert_eq!(third.time_ms, 300);
        assert_eq!(third.commands_executed, 1);
        assert_eq!(third.deaths, vec![victim]);
    }

    #[test]
    fn run_for_counts_ticks_and_calls_back() {
        struct Counter(u64);
        impl TickCallback for Counter {
            fn on_tick(&mut self, _summary: &TickSummary, _level: &Level) {
                self.0 = self.0.saturating_add(1);
            }
        }

        let mut level = level();
        let mut counter = Counter(0);
        let result = run_for(&mut level, 5, &mut counter).expect("run");
        assert_eq!(result.total_ticks, 5);
        assert_eq!(counter.0, 5);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(5));
    }
}
