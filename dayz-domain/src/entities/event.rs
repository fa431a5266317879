// Event entities
// Typed records extracted from ADM and RPT logs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::value_objects::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginEvent {
    pub player_id: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEvent {
    pub player_id: String,
    pub position: Position,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEvent {
    pub item_name: String,
    pub position: Position,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub files: usize,
    pub lines: usize,
    pub events: usize,
    pub skipped: usize,
}

impl ParseStats {
    pub fn merge(&mut self, other: &ParseStats) {
        self.files += other.files;
        self.lines += other.lines;
        self.events += other.events;
        self.skipped += other.skipped;
    }
}

/// Everything pulled out of one or more ADM logs.
#[derive(Debug, Clone, Default)]
pub struct AdmEvents {
    pub logins: Vec<LoginEvent>,
    pub positions: Vec<PositionEvent>,
    pub stats: ParseStats,
}

impl AdmEvents {
    pub fn extend(&mut self, other: AdmEvents) {
        self.logins.extend(other.logins);
        self.positions.extend(other.positions);
        self.stats.merge(&other.stats);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RptEvents {
    pub spawns: Vec<SpawnEvent>,
    pub stats: ParseStats,
}

impl RptEvents {
    pub fn extend(&mut self, other: RptEvents) {
        self.spawns.extend(other.spawns);
        self.stats.merge(&other.stats);
    }
}
