use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use glob::{glob_with, MatchOptions};
use tokio::fs;
use tracing::{debug, warn};

use dayz_domain::{AdmEvents, LogRepository, RptEvents};

use crate::parsers::{AdmParser, RptParser};
use crate::utils::decode_log_bytes;

/// Reads ADM/RPT logs from local disk. Patterns are globs; `.gz` archives
/// are matched by their inner name.
pub struct FsLogRepository {
    adm: AdmParser,
    rpt: RptParser,
}

impl FsLogRepository {
    pub fn new() -> Result<Self> {
        Ok(Self {
            adm: AdmParser::new()?,
            rpt: RptParser::new()?,
        })
    }
}

/// Expands a glob pattern (case-insensitive, wildcards allowed in any path
/// component) into a sorted list of existing files. `x.ADM.gz` counts as a
/// match for a pattern that matches `x.ADM`.
pub fn resolve_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let mut matched = Vec::new();
    for candidate in [pattern.to_string(), format!("{}.gz", pattern)] {
        let paths = glob_with(&candidate, options)
            .with_context(|| format!("invalid log pattern {}", pattern))?;
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => matched.push(path),
                Ok(_) => {}
                Err(err) => debug!("skipping unreadable path: {}", err),
            }
        }
    }
    matched.sort();
    matched.dedup();
    Ok(matched)
}

async fn read_log(path: &Path) -> Option<String> {
    let name = path.to_string_lossy().to_string();
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("skipping unreadable log {}: {}", name, err);
            return None;
        }
    };
    match decode_log_bytes(&name, &bytes) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!("skipping undecodable log {}: {:#}", name, err);
            None
        }
    }
}

#[async_trait]
impl LogRepository for FsLogRepository {
    async fn load_adm(&self, pattern: &str) -> Result<AdmEvents> {
        let mut out = AdmEvents::default();
        for path in resolve_pattern(pattern)? {
            let Some(content) = read_log(&path).await else {
                continue;
            };
            let events = self.adm.parse_str(&content);
            debug!(
                "{}: {} lines, {} logins, {} positions, {} skipped",
                path.display(),
                events.stats.lines,
                events.logins.len(),
                events.positions.len(),
                events.stats.skipped
            );
            out.extend(events);
        }
        Ok(out)
    }

    async fn load_rpt(&self, pattern: &str) -> Result<RptEvents> {
        let mut out = RptEvents::default();
        for path in resolve_pattern(pattern)? {
            let Some(content) = read_log(&path).await else {
                continue;
            };
            let events = self.rpt.parse_str(&content);
            debug!(
                "{}: {} lines, {} spawns, {} skipped",
                path.display(),
                events.stats.lines,
                events.spawns.len(),
                events.stats.skipped
            );
            out.extend(events);
        }
        Ok(out)
    }

    async fn save_raw(&self, dir: &str, name: &str, content: &[u8]) -> Result<String> {
        // remote names are untrusted; keep only the final component
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("invalid file name {:?}", name))?;
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir))?;
        let path = Path::new(dir).join(file_name);
        fs::write(&path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path.to_string_lossy().to_string())
    }
}
