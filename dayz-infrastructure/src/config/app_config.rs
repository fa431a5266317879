use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use dayz_domain::{
    NitradoConfig, RuntimeConfig, ScanConfig, ScanSettings, DEFAULT_LOGIN_COUNT_THRESHOLD,
    DEFAULT_LOGIN_THRESHOLD, DEFAULT_PROXIMITY_THRESHOLD, DEFAULT_TIME_THRESHOLD,
};

use crate::config::validation::validate_base_url;

pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";
pub const DEFAULT_NITRADO_API_BASE_URL: &str = "https://api.nitrado.net/services/";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralSection,
    pub duping_detector: DupingDetectorSection,
    pub nitrado: NitradoSection,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralSection {
    pub log_dir: String,
    pub output_dir: String,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DupingDetectorSection {
    pub proximity_threshold: Option<f64>,
    pub time_threshold: Option<f64>,
    pub login_threshold: Option<i64>,
    pub login_count_threshold: Option<i64>,
}

impl Default for DupingDetectorSection {
    fn default() -> Self {
        Self {
            proximity_threshold: Some(DEFAULT_PROXIMITY_THRESHOLD),
            time_threshold: Some(DEFAULT_TIME_THRESHOLD),
            login_threshold: Some(DEFAULT_LOGIN_THRESHOLD),
            login_count_threshold: Some(DEFAULT_LOGIN_COUNT_THRESHOLD),
        }
    }
}

impl DupingDetectorSection {
    pub fn to_settings(&self) -> ScanSettings {
        ScanSettings {
            proximity_threshold: self.proximity_threshold,
            time_threshold: self.time_threshold,
            login_threshold: self.login_threshold,
            login_count_threshold: self.login_count_threshold,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NitradoSection {
    pub api_token: Option<String>,
    pub service_id: Option<String>,
    pub server_id: Option<String>,
    pub api_base_url: String,
    pub remote_base_path: String,
    pub request_timeout_seconds: u64,
    pub default_patterns: Vec<String>,
}

impl Default for NitradoSection {
    fn default() -> Self {
        Self {
            api_token: None,
            service_id: None,
            server_id: None,
            api_base_url: DEFAULT_NITRADO_API_BASE_URL.to_string(),
            remote_base_path: "/gameserver".to_string(),
            request_timeout_seconds: 30,
            default_patterns: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, then `DAYZ_CONFIG`, then `./config.toml`. A missing file
    /// falls back to defaults.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = path
            .or_else(|| env::var("DAYZ_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let base_dir = path.parent();

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            Self::from_toml(&content).with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            warn!("{} not found, using defaults", path.display());
            AppConfig::default()
        };
        config.apply_overrides_from(|key| env::var(key).ok());
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn normalize(&mut self) {
        let nitrado = &mut self.nitrado;
        nitrado.api_token = non_blank(nitrado.api_token.take());
        nitrado.service_id = non_blank(nitrado.service_id.take());
        nitrado.server_id = non_blank(nitrado.server_id.take());

        let base = nitrado.api_base_url.trim().trim_end_matches('/').to_string();
        nitrado.api_base_url = format!("{}/", base);

        let remote = nitrado.remote_base_path.trim().trim_matches('/');
        nitrado.remote_base_path = if remote.is_empty() {
            String::new()
        } else {
            format!("/{}", remote)
        };
        nitrado.default_patterns = normalize_pattern_list(std::mem::take(&mut nitrado.default_patterns));

        self.general.log_dir = self.general.log_dir.trim().to_string();
        self.general.output_dir = self.general.output_dir.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.general.log_dir = resolve_path(base, &self.general.log_dir);
        self.general.output_dir = resolve_path(base, &self.general.output_dir);
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.log_dir.is_empty() {
            return Err(anyhow!("general.log_dir must not be empty"));
        }
        if self.general.output_dir.is_empty() {
            return Err(anyhow!("general.output_dir must not be empty"));
        }
        ScanConfig::try_from(self.duping_detector.to_settings())
            .map_err(|err| anyhow!("duping_detector: {}", err))?;
        validate_base_url(&self.nitrado.api_base_url)?;
        if self.nitrado.request_timeout_seconds == 0 {
            return Err(anyhow!("nitrado.request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            log_dir: self.general.log_dir.clone(),
            output_dir: self.general.output_dir.clone(),
            scan: self.duping_detector.to_settings(),
            nitrado: self.to_nitrado_config(),
        }
    }

    pub fn to_nitrado_config(&self) -> NitradoConfig {
        NitradoConfig {
            api_token: self.nitrado.api_token.clone(),
            service_id: self.nitrado.service_id.clone(),
            server_id: self.nitrado.server_id.clone(),
            api_base_url: self.nitrado.api_base_url.clone(),
            remote_base_path: self.nitrado.remote_base_path.clone(),
            request_timeout_seconds: self.nitrado.request_timeout_seconds,
            default_patterns: self.nitrado.default_patterns.clone(),
        }
    }

    /// Applies `DAYZ_*` overrides; `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DAYZ_LOG_DIR") {
            self.general.log_dir = value;
        }
        if let Some(value) = lookup("DAYZ_OUTPUT_DIR") {
            self.general.output_dir = value;
        }

        let detector = &mut self.duping_detector;
        if let Some(value) = lookup("DAYZ_PROXIMITY_THRESHOLD") {
            detector.proximity_threshold = parse_or_warn("DAYZ_PROXIMITY_THRESHOLD", &value)
                .or(detector.proximity_threshold);
        }
        if let Some(value) = lookup("DAYZ_TIME_THRESHOLD") {
            detector.time_threshold =
                parse_or_warn("DAYZ_TIME_THRESHOLD", &value).or(detector.time_threshold);
        }
        if let Some(value) = lookup("DAYZ_LOGIN_THRESHOLD") {
            detector.login_threshold =
                parse_or_warn("DAYZ_LOGIN_THRESHOLD", &value).or(detector.login_threshold);
        }
        if let Some(value) = lookup("DAYZ_LOGIN_COUNT_THRESHOLD") {
            detector.login_count_threshold = parse_or_warn("DAYZ_LOGIN_COUNT_THRESHOLD", &value)
                .or(detector.login_count_threshold);
        }

        let nitrado = &mut self.nitrado;
        if let Some(value) = lookup("DAYZ_NITRADO_API_TOKEN") {
            nitrado.api_token = Some(value);
        }
        if let Some(value) = lookup("DAYZ_NITRADO_SERVICE_ID") {
            nitrado.service_id = Some(value);
        }
        if let Some(value) = lookup("DAYZ_NITRADO_SERVER_ID") {
            nitrado.server_id = Some(value);
        }
        if let Some(value) = lookup("DAYZ_NITRADO_API_BASE_URL") {
            nitrado.api_base_url = value;
        }
        if let Some(value) = lookup("DAYZ_NITRADO_REMOTE_BASE_PATH") {
            nitrado.remote_base_path = value;
        }
        if let Some(value) = lookup("DAYZ_NITRADO_REQUEST_TIMEOUT_SECONDS") {
            nitrado.request_timeout_seconds = value.parse().unwrap_or(nitrado.request_timeout_seconds);
        }
        if let Some(value) = lookup("DAYZ_NITRADO_DEFAULT_PATTERNS") {
            nitrado.default_patterns = parse_env_list(&value);
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring {}: not a number: {}", key, value);
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

fn parse_env_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn normalize_pattern_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = values
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
