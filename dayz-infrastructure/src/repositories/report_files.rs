use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::fs;
use tracing::info;

use dayz_domain::{ReportRepository, SuspicionRecord};

use crate::services::{render_activities_csv, render_logins_csv, render_spawns_csv};

/// Writes the three CSV reports of a scan into `output_dir`.
pub struct CsvReportRepository {
    output_dir: PathBuf,
}

impl CsvReportRepository {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    async fn write(&self, prefix: &str, stamp: &str, content: Vec<u8>) -> Result<String> {
        let path = self.output_dir.join(format!("{}_{}.csv", prefix, stamp));
        fs::write(&path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path.to_string_lossy().to_string())
    }
}

#[async_trait]
impl ReportRepository for CsvReportRepository {
    async fn write_scan_report(
        &self,
        records: &[SuspicionRecord],
        generated_at: NaiveDateTime,
    ) -> Result<Vec<String>> {
        fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("failed to create {}", self.output_dir.display()))?;
        let stamp = generated_at.format("%Y%m%d_%H%M%S").to_string();

        let files = vec![
            self.write("suspicious_activities", &stamp, render_activities_csv(records)?)
                .await?,
            self.write("suspicious_spawns", &stamp, render_spawns_csv(records)?)
                .await?,
            self.write("suspicious_logins", &stamp, render_logins_csv(records)?)
                .await?,
        ];
        info!(
            "wrote {} report files to {}",
            files.len(),
            self.output_dir.display()
        );
        Ok(files)
    }
}
