// Suspicion entity
// A player whose logins line up with freshly spawned loot

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entities::SpawnEvent;
use crate::value_objects::Position;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnMatch {
    pub spawn: SpawnEvent,
    pub distance: f64,
    /// Absolute seconds between the login and the spawn.
    pub time_delta: f64,
    pub login_time: NaiveDateTime,
    pub login_position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspicionRecord {
    pub player_id: String,
    pub login_count: usize,
    pub matched_spawns: Vec<SpawnMatch>,
    pub qualifying_logins: Vec<NaiveDateTime>,
}

impl SuspicionRecord {
    pub fn first_match(&self) -> Option<&SpawnMatch> {
        self.matched_spawns.first()
    }
}
