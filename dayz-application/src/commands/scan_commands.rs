use std::path::Path;

use chrono::Local;
use tracing::{info, warn};

use dayz_domain::{scan, ScanConfig, ScanRequest, ScanSettings, ScanSummary, SuspicionRecord};

use crate::{AppError, AppState};

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub summary: ScanSummary,
    pub records: Vec<SuspicionRecord>,
}

pub async fn run_duping_scan(state: &AppState, request: ScanRequest) -> Result<ScanOutcome, AppError> {
    let overrides = request.overrides.unwrap_or_else(ScanSettings::empty);
    let config = ScanConfig::try_from(state.config.scan.with_overrides(&overrides))?;

    let adm_pattern = request
        .adm_pattern
        .unwrap_or_else(|| default_pattern(&state.config.log_dir, "*.ADM"));
    let rpt_pattern = request
        .rpt_pattern
        .unwrap_or_else(|| default_pattern(&state.config.log_dir, "*.RPT"));

    info!(
        "duping scan: adm={} rpt={} proximity={}m time={}s login={}s login_count={}",
        adm_pattern,
        rpt_pattern,
        config.proximity_threshold,
        config.time_threshold,
        config.login_threshold,
        config.login_count_threshold
    );

    let adm = state.log_repo.load_adm(&adm_pattern).await?;
    let rpt = state.log_repo.load_rpt(&rpt_pattern).await?;
    state.metrics.record_parse(&adm.stats);
    state.metrics.record_parse(&rpt.stats);

    if adm.stats.files == 0 {
        warn!("no ADM files matched {}", adm_pattern);
    }
    if rpt.stats.files == 0 {
        warn!("no RPT files matched {}", rpt_pattern);
    }
    info!(
        "parsed {} logins, {} positions, {} spawns",
        adm.logins.len(),
        adm.positions.len(),
        rpt.spawns.len()
    );

    let records = scan(&adm.logins, &adm.positions, &rpt.spawns, &config)?;
    state.metrics.record_suspicions(records.len());

    let report_files = state
        .report_repo
        .write_scan_report(&records, Local::now().naive_local())
        .await?;

    let summary = ScanSummary {
        logins: adm.logins.len(),
        positions: adm.positions.len(),
        spawns: rpt.spawns.len(),
        suspicious_players: records.len(),
        matched_spawns: records.iter().map(|r| r.matched_spawns.len()).sum(),
        report_files,
    };
    Ok(ScanOutcome { summary, records })
}

fn default_pattern(log_dir: &str, file_pattern: &str) -> String {
    Path::new(log_dir)
        .join(file_pattern)
        .to_string_lossy()
        .to_string()
}
