use anyhow::Result;
use csv::Writer;

use dayz_domain::{format_timestamp, round2, ScanSummary, SuspicionRecord};

const SUMMARY_LIMIT: usize = 8;

/// One row per suspicious player.
pub fn render_activities_csv(records: &[SuspicionRecord]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "player_id",
        "login_count",
        "matched_spawn_count",
        "first_match_item",
        "first_match_distance",
        "first_match_time_delta",
    ])?;
    for record in records {
        let (item, distance, delta) = match record.first_match() {
            Some(hit) => (
                hit.spawn.item_name.clone(),
                round2(hit.distance).to_string(),
                round2(hit.time_delta).to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        writer.write_record([
            record.player_id.clone(),
            record.login_count.to_string(),
            record.matched_spawns.len().to_string(),
            item,
            distance,
            delta,
        ])?;
    }
    finish(writer)
}

/// One row per matched spawn.
pub fn render_spawns_csv(records: &[SuspicionRecord]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "player_id",
        "login_time",
        "login_x",
        "login_y",
        "item_name",
        "spawn_time",
        "spawn_x",
        "spawn_y",
        "distance",
        "time_delta",
    ])?;
    for record in records {
        for hit in &record.matched_spawns {
            writer.write_record([
                record.player_id.clone(),
                format_timestamp(hit.login_time),
                hit.login_position.x.to_string(),
                hit.login_position.y.to_string(),
                hit.spawn.item_name.clone(),
                format_timestamp(hit.spawn.timestamp),
                hit.spawn.position.x.to_string(),
                hit.spawn.position.y.to_string(),
                round2(hit.distance).to_string(),
                round2(hit.time_delta).to_string(),
            ])?;
        }
    }
    finish(writer)
}

pub fn render_logins_csv(records: &[SuspicionRecord]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["player_id", "login_count", "qualifying_logins"])?;
    for record in records {
        let logins = record
            .qualifying_logins
            .iter()
            .map(|value| format_timestamp(*value))
            .collect::<Vec<_>>()
            .join(", ");
        writer.write_record([
            record.player_id.clone(),
            record.login_count.to_string(),
            logins,
        ])?;
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("csv flush failed: {}", err))
}

/// Short text summary printed after a scan.
pub fn render_console_summary(summary: &ScanSummary, records: &[SuspicionRecord]) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "parsed {} logins, {} positions, {} spawns",
        summary.logins, summary.positions, summary.spawns
    ));
    if records.is_empty() {
        lines.push("no suspicious activity detected".to_string());
    } else {
        lines.push(format!(
            "{} suspicious players, {} matched spawns",
            summary.suspicious_players, summary.matched_spawns
        ));
        for record in records.iter().take(SUMMARY_LIMIT) {
            let first = record
                .first_match()
                .map(|hit| {
                    format!(
                        "{} at {}m / {}s",
                        hit.spawn.item_name,
                        round2(hit.distance),
                        round2(hit.time_delta)
                    )
                })
                .unwrap_or_default();
            lines.push(format!(
                "{} | logins {} | spawns {} | {}",
                record.player_id,
                record.login_count,
                record.matched_spawns.len(),
                first
            ));
        }
        if records.len() > SUMMARY_LIMIT {
            lines.push(format!("... {} more", records.len() - SUMMARY_LIMIT));
        }
    }
    for path in &summary.report_files {
        lines.push(format!("report written: {}", path));
    }
    lines.join("\n")
}
