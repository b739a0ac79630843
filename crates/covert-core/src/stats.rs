//! Mission statistics.
//!
//! Kill records and the "been spotted" / "disguises worn" flags that an
//! after-action report reads. The engine only ever appends.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use covert_types::ActorId;
use serde::Serialize;

/// One recorded death.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KillRecord {
    /// The victim.
    pub victim: ActorId,
    /// Victim's name.
    pub victim_name: String,
    /// Cause of death, naming the killer when known.
    pub cause: String,
    /// Whether the player was responsible.
    pub by_player: bool,
    /// Tick of death.
    pub tick: u64,
}

/// Running totals for one mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionStats {
    /// Wall-clock start of the mission.
    pub started_at: DateTime<Utc>,
    /// Every death, in order.
    pub kills: Vec<KillRecord>,
    /// Whether the player was ever seen doing something dangerous.
    pub been_spotted: bool,
    /// Disguises the player has worn.
    pub disguises_worn: BTreeSet<String>,
    /// Distinct bodies discovered.
    pub bodies_found: u32,
}

impl MissionStats {
    /// Fresh statistics starting now.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            kills: Vec::new(),
            been_spotted: false,
            disguises_worn: BTreeSet::new(),
            bodies_found: 0,
        }
    }

    /// Append a death.
    pub fn record_kill(&mut self, record: KillRecord) {
        self.kills.push(record);
    }

    /// Flag that the player was spotted.
    pub const fn mark_spotted(&mut self) {
        self.been_spotted = true;
    }

    /// Note a disguise the player put on.
    pub fn record_disguise(&mut self, name: &str) {
        self.disguises_worn.insert(name.to_owned());
    }

    /// Count a newly discovered body.
    pub const fn record_body_found(&mut self) {
        self.bodies_found = self.bodies_found.saturating_add(1);
    }

    /// Deaths caused by the player.
    pub fn player_kills(&self) -> usize {
        self.kills.iter().filter(|k| k.by_player).count()
    }
}

impl Default for MissionStats {
    fn default() -> Self {
        Self::new()
    }
}
