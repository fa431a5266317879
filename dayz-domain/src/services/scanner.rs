use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;

use crate::entities::{LoginEvent, PositionEvent, ScanConfig, SpawnEvent, SpawnMatch, SuspicionRecord};
use crate::error::ScanError;
use crate::utils::seconds_between;
use crate::value_objects::Position;

/// Flags players who re-log repeatedly and have loot spawning next to them
/// shortly after one of those logins.
///
/// Login positions come from `positions`: the player's last known position at
/// or before the login. A login with no earlier position cannot match.
///
/// Records are ordered by `login_count` descending, then `player_id`.
pub fn scan(
    logins: &[LoginEvent],
    positions: &[PositionEvent],
    spawns: &[SpawnEvent],
    config: &ScanConfig,
) -> Result<Vec<SuspicionRecord>, ScanError> {
    config.validate()?;

    let tracks = PositionIndex::build(positions);
    let mut records = Vec::new();
    for (player_id, times) in group_logins(logins) {
        let qualifying = qualifying_logins(&times, config.login_threshold);
        if (qualifying.len() as i64) < config.login_count_threshold {
            continue;
        }
        let matched_spawns = match_spawns(player_id, &qualifying, &tracks, spawns, config);
        if matched_spawns.is_empty() {
            continue;
        }
        records.push(SuspicionRecord {
            player_id: player_id.to_string(),
            login_count: qualifying.len(),
            matched_spawns,
            qualifying_logins: qualifying,
        });
    }

    records.sort_by(|a, b| {
        b.login_count
            .cmp(&a.login_count)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    Ok(records)
}

fn group_logins(logins: &[LoginEvent]) -> BTreeMap<&str, Vec<NaiveDateTime>> {
    let mut groups: BTreeMap<&str, Vec<NaiveDateTime>> = BTreeMap::new();
    for login in logins {
        groups
            .entry(login.player_id.as_str())
            .or_default()
            .push(login.timestamp);
    }
    for times in groups.values_mut() {
        times.sort();
    }
    groups
}

/// Drops reconnect noise: a login counts only when the gap to the previous
/// login is at least `login_threshold` seconds. The first login always counts.
fn qualifying_logins(sorted: &[NaiveDateTime], login_threshold: i64) -> Vec<NaiveDateTime> {
    let min_gap_ms = login_threshold.saturating_mul(1000);
    let mut out = Vec::with_capacity(sorted.len());
    let mut previous: Option<NaiveDateTime> = None;
    for &time in sorted {
        let qualifies = match previous {
            None => true,
            Some(prev) => (time - prev).num_milliseconds() >= min_gap_ms,
        };
        if qualifies {
            out.push(time);
        }
        previous = Some(time);
    }
    out
}

fn match_spawns(
    player_id: &str,
    qualifying: &[NaiveDateTime],
    tracks: &PositionIndex<'_>,
    spawns: &[SpawnEvent],
    config: &ScanConfig,
) -> Vec<SpawnMatch> {
    let anchors: Vec<(NaiveDateTime, Position)> = qualifying
        .iter()
        .filter_map(|&time| tracks.last_known(player_id, time).map(|pos| (time, pos)))
        .collect();
    if anchors.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<(usize, SpawnMatch)> = Vec::new();
    for (index, spawn) in spawns.iter().enumerate() {
        let mut best: Option<SpawnMatch> = None;
        for &(login_time, login_position) in &anchors {
            let time_delta = seconds_between(login_time, spawn.timestamp).abs();
            if time_delta > config.time_threshold {
                continue;
            }
            let distance = login_position.distance_to(&spawn.position);
            if distance > config.proximity_threshold {
                continue;
            }
            // strict: on equal deltas the earlier login keeps the match
            if best.as_ref().map_or(true, |current| time_delta < current.time_delta) {
                best = Some(SpawnMatch {
                    spawn: spawn.clone(),
                    distance,
                    time_delta,
                    login_time,
                    login_position,
                });
            }
        }
        if let Some(found) = best {
            matches.push((index, found));
        }
    }

    matches.sort_by(|(ia, a), (ib, b)| {
        a.spawn
            .timestamp
            .cmp(&b.spawn.timestamp)
            .then_with(|| ia.cmp(ib))
    });
    matches.into_iter().map(|(_, found)| found).collect()
}

/// Per-player position history sorted by time.
struct PositionIndex<'a> {
    tracks: HashMap<&'a str, Vec<(NaiveDateTime, Position)>>,
}

impl<'a> PositionIndex<'a> {
    fn build(positions: &'a [PositionEvent]) -> Self {
        let mut tracks: HashMap<&'a str, Vec<(NaiveDateTime, Position)>> = HashMap::new();
        for event in positions {
            tracks
                .entry(event.player_id.as_str())
                .or_default()
                .push((event.timestamp, event.position));
        }
        // stable sort keeps log order among identical timestamps
        for track in tracks.values_mut() {
            track.sort_by_key(|(time, _)| *time);
        }
        Self { tracks }
    }

    fn last_known(&self, player_id: &str, at: NaiveDateTime) -> Option<Position> {
        let track = self.tracks.get(player_id)?;
        let idx = track.partition_point(|(time, _)| *time <= at);
        if idx == 0 {
            return None;
        }
        Some(track[idx - 1].1)
    }
}
