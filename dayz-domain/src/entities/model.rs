use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 10.0;
pub const DEFAULT_TIME_THRESHOLD: f64 = 60.0;
pub const DEFAULT_LOGIN_THRESHOLD: i64 = 300;
pub const DEFAULT_LOGIN_COUNT_THRESHOLD: i64 = 3;

/// Thresholds as they arrive from config files and flags; any may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub proximity_threshold: Option<f64>,
    pub time_threshold: Option<f64>,
    pub login_threshold: Option<i64>,
    pub login_count_threshold: Option<i64>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            proximity_threshold: Some(DEFAULT_PROXIMITY_THRESHOLD),
            time_threshold: Some(DEFAULT_TIME_THRESHOLD),
            login_threshold: Some(DEFAULT_LOGIN_THRESHOLD),
            login_count_threshold: Some(DEFAULT_LOGIN_COUNT_THRESHOLD),
        }
    }
}

impl ScanSettings {
    pub fn with_overrides(self, overrides: &ScanSettings) -> Self {
        Self {
            proximity_threshold: overrides.proximity_threshold.or(self.proximity_threshold),
            time_threshold: overrides.time_threshold.or(self.time_threshold),
            login_threshold: overrides.login_threshold.or(self.login_threshold),
            login_count_threshold: overrides.login_count_threshold.or(self.login_count_threshold),
        }
    }

    pub fn empty() -> Self {
        Self {
            proximity_threshold: None,
            time_threshold: None,
            login_threshold: None,
            login_count_threshold: None,
        }
    }
}

/// Validated scanner thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanConfig {
    /// Meters.
    pub proximity_threshold: f64,
    /// Seconds between a login and a spawn.
    pub time_threshold: f64,
    /// Minimum seconds between consecutive logins.
    pub login_threshold: i64,
    pub login_count_threshold: i64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            time_threshold: DEFAULT_TIME_THRESHOLD,
            login_threshold: DEFAULT_LOGIN_THRESHOLD,
            login_count_threshold: DEFAULT_LOGIN_COUNT_THRESHOLD,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        check_positive_f64("proximity_threshold", self.proximity_threshold)?;
        check_positive_f64("time_threshold", self.time_threshold)?;
        if self.login_threshold <= 0 {
            return Err(ScanError::InvalidConfiguration(format!(
                "login_threshold must be greater than 0, got {}",
                self.login_threshold
            )));
        }
        if self.login_count_threshold < 1 {
            return Err(ScanError::InvalidConfiguration(format!(
                "login_count_threshold must be at least 1, got {}",
                self.login_count_threshold
            )));
        }
        Ok(())
    }
}

impl TryFrom<ScanSettings> for ScanConfig {
    type Error = ScanError;

    fn try_from(settings: ScanSettings) -> Result<Self, Self::Error> {
        let config = Self {
            proximity_threshold: require("proximity_threshold", settings.proximity_threshold)?,
            time_threshold: require("time_threshold", settings.time_threshold)?,
            login_threshold: require("login_threshold", settings.login_threshold)?,
            login_count_threshold: require(
                "login_count_threshold",
                settings.login_count_threshold,
            )?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn require<T>(name: &str, value: Option<T>) -> Result<T, ScanError> {
    value.ok_or_else(|| ScanError::InvalidConfiguration(format!("{} is missing", name)))
}

fn check_positive_f64(name: &str, value: f64) -> Result<(), ScanError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ScanError::InvalidConfiguration(format!(
        "{} must be a positive number, got {}",
        name, value
    )))
}

#[derive(Debug, Clone, Default)]
pub struct NitradoConfig {
    pub api_token: Option<String>,
    pub service_id: Option<String>,
    pub server_id: Option<String>,
    pub api_base_url: String,
    pub remote_base_path: String,
    pub request_timeout_seconds: u64,
    pub default_patterns: Vec<String>,
}

impl NitradoConfig {
    pub fn default_log_directory(&self) -> String {
        format!(
            "games/{}/ftproot/dayzxb/config/",
            self.server_id.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_dir: String,
    pub output_dir: String,
    pub scan: ScanSettings,
    pub nitrado: NitradoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLogFile {
    pub name: String,
    pub path: String,
    pub size: Option<u64>,
    pub modified_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub adm_pattern: Option<String>,
    pub rpt_pattern: Option<String>,
    pub overrides: Option<ScanSettings>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub logins: usize,
    pub positions: usize,
    pub spawns: usize,
    pub suspicious_players: usize,
    pub matched_spawns: usize,
    pub report_files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub output_dir: Option<String>,
    pub remote_dir: Option<String>,
    /// `D.M.YYYY`, inclusive.
    pub start_date: Option<String>,
    /// `D.M.YYYY`, inclusive.
    pub end_date: Option<String>,
    pub patterns: Vec<String>,
    pub download_all: bool,
    /// With no date or pattern filter, select every ADM/RPT file.
    pub latest_default: bool,
}

impl Default for DownloadRequest {
    fn default() -> Self {
        Self {
            output_dir: None,
            remote_dir: None,
            start_date: None,
            end_date: None,
            patterns: Vec::new(),
            download_all: false,
            latest_default: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DownloadSummary {
    pub listed: usize,
    pub matched: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub output_dir: String,
}
