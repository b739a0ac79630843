//! Tick callback that forwards notifications and the after-action report.

use covert_core::{
    KillRecord, Level, LogSink, MissionStats, NotificationSink, RunResult, TickCallback,
    TickSummary,
};
use covert_types::Observation;
use serde::Serialize;
use tracing::debug;

/// Forwards each tick's notifications to a [`LogSink`].
#[derive(Debug, Default)]
pub struct ReportCallback {
    sink: LogSink,
    busiest_tick: Option<(u64, usize)>,
}

impl ReportCallback {
    /// New callback with an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications forwarded so far.
    pub const fn forwarded(&self) -> u64 {
        self.sink.forwarded()
    }
}

impl TickCallback for ReportCallback {
    fn on_tick(&mut self, summary: &TickSummary, _level: &Level) {
        for notification in &summary.notifications {
            self.sink.notify(notification);
        }
        if self
            .busiest_tick
            .is_none_or(|(_, commands)| summary.commands_executed > commands)
        {
            self.busiest_tick = Some((summary.tick, summary.commands_executed));
        }
        debug!(
            tick = summary.tick,
            commands = summary.commands_executed,
            perceptions = summary.perceptions,
            notifications = summary.notifications.len(),
            "Tick forwarded"
        );
    }
}

/// What the binary prints when the run ends.
#[derive(Debug, Serialize)]
pub struct AfterActionReport<'a> {
    /// Ticks executed.
    pub ticks: u64,
    /// Simulation time reached, in milliseconds.
    pub time_ms: u64,
    /// Deaths over the run.
    pub deaths: usize,
    /// Kills credited to the player.
    pub player_kills: usize,
    /// Every recorded death.
    pub kills: &'a [KillRecord],
    /// Incidents raised, by kind.
    pub incidents: Vec<(Observation, usize)>,
    /// Notifications forwarded to the sink.
    pub notifications: u64,
    /// Tick that fired the most commands, with the count.
    pub busiest_tick: Option<(u64, usize)>,
    /// Commands still waiting when the run stopped.
    pub pending_commands: usize,
    /// Full mission statistics.
    pub stats: &'a MissionStats,
}

impl<'a> AfterActionReport<'a> {
    /// Assemble the report from the finished level.
    pub fn new(level: &'a Level, run: &RunResult, callback: &ReportCallback) -> Self {
        let mut incidents: Vec<(Observation, usize)> = Vec::new();
        for report in level.incidents.iter() {
            match incidents.iter_mut().find(|(kind, _)| *kind == report.observation) {
                Some((_, count)) => *count = count.saturating_add(1),
                None => incidents.push((report.observation, 1)),
            }
        }

        Self {
            ticks: run.total_ticks,
            time_ms: level.now_ms(),
            deaths: run.total_deaths,
            player_kills: level.stats.player_kills(),
            kills: &level.stats.kills,
            incidents,
            notifications: callback.forwarded(),
            busiest_tick: callback.busiest_tick,
            pending_commands: level.scheduler.len(),
            stats: &level.stats,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use covert_core::{SimulationConfig, run_for};
    use covert_world::TileMap;

    use super::*;

    #[test]
    fn report_counts_ticks_and_serializes() {
        let map = TileMap::new(3, 3).expect("map");
        let mut level = Level::new(map, SimulationConfig::default()).expect("level");
        let mut callback = ReportCallback::new();
        let run = run_for(&mut level, 4, &mut callback).expect("run");

        let report = AfterActionReport::new(&level, &run, &callback);
        assert_eq!(report.ticks, 4);
        assert_eq!(report.time_ms, 400);
        assert!(report.kills.is_empty());

        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json["deaths"], 0);
        assert_eq!(callback.busiest_tick, Some((1, 0)));
    }
}
