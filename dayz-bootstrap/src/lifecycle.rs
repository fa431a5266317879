use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use dayz_application::{download_logs, run_duping_scan};
use dayz_domain::{DownloadRequest, ScanRequest, ScanSettings};
use dayz_infrastructure::render_console_summary;

use crate::context::AppContext;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan ADM/RPT logs for loot duplication by reconnecting
    Scan(ScanArgs),
    /// Download ADM/RPT logs from the Nitrado file server
    DownloadLogs(DownloadArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// ADM log file or wildcard pattern (default: <log_dir>/*.ADM)
    #[arg(long)]
    pub adm_file: Option<String>,
    /// RPT log file or wildcard pattern (default: <log_dir>/*.RPT)
    #[arg(long)]
    pub rpt_file: Option<String>,
    /// Max distance in meters between login position and spawn
    #[arg(long)]
    pub proximity_threshold: Option<f64>,
    /// Max seconds between login and spawn
    #[arg(long)]
    pub time_threshold: Option<f64>,
    /// Min seconds between logins for a login to count
    #[arg(long)]
    pub login_threshold: Option<i64>,
    /// Min qualifying logins before a player is examined
    #[arg(long)]
    pub login_count_threshold: Option<i64>,
}

impl From<ScanArgs> for ScanRequest {
    fn from(args: ScanArgs) -> Self {
        ScanRequest {
            adm_pattern: args.adm_file,
            rpt_pattern: args.rpt_file,
            overrides: Some(ScanSettings {
                proximity_threshold: args.proximity_threshold,
                time_threshold: args.time_threshold,
                login_threshold: args.login_threshold,
                login_count_threshold: args.login_count_threshold,
            }),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Local directory for downloaded logs (default: general.log_dir)
    #[arg(long)]
    pub output_dir: Option<String>,
    /// First day to include, D.M.YYYY
    #[arg(long)]
    pub start_date: Option<String>,
    /// Last day to include, D.M.YYYY
    #[arg(long)]
    pub end_date: Option<String>,
    /// File name pattern, repeatable (e.g. "*.ADM")
    #[arg(long = "pattern")]
    pub patterns: Vec<String>,
    /// Download every ADM/RPT file, ignoring other filters
    #[arg(long)]
    pub all: bool,
    /// Remote directory (default: games/<server_id>/ftproot/dayzxb/config/)
    #[arg(long)]
    pub remote_dir: Option<String>,
    /// Download nothing when no date or pattern filter is given
    #[arg(long)]
    pub no_latest_default: bool,
}

impl From<DownloadArgs> for DownloadRequest {
    fn from(args: DownloadArgs) -> Self {
        DownloadRequest {
            output_dir: args.output_dir,
            remote_dir: args.remote_dir,
            start_date: args.start_date,
            end_date: args.end_date,
            patterns: args.patterns,
            download_all: args.all,
            latest_default: !args.no_latest_default,
        }
    }
}

pub async fn run(config_path: Option<PathBuf>, command: Command) -> Result<()> {
    let context = AppContext::new(config_path).await?;
    let state = context.state;

    match command {
        Command::Scan(args) => {
            let outcome = run_duping_scan(&state, args.into()).await?;
            println!("{}", render_console_summary(&outcome.summary, &outcome.records));
        }
        Command::DownloadLogs(args) => {
            let summary = download_logs(&state, args.into()).await?;
            println!(
                "matched {} of {} remote files, downloaded {}, failed {} -> {}",
                summary.matched, summary.listed, summary.downloaded, summary.failed, summary.output_dir
            );
        }
    }

    info!("{}", state.metrics.render_summary());
    Ok(())
}
