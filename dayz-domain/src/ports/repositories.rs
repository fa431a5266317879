use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::entities::{AdmEvents, RptEvents, SuspicionRecord};

#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Parses every ADM file matching `pattern`.
    async fn load_adm(&self, pattern: &str) -> anyhow::Result<AdmEvents>;
    /// Parses every RPT file matching `pattern`.
    async fn load_rpt(&self, pattern: &str) -> anyhow::Result<RptEvents>;
    async fn save_raw(&self, dir: &str, name: &str, content: &[u8]) -> anyhow::Result<String>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Writes the report files and returns their paths.
    async fn write_scan_report(
        &self,
        records: &[SuspicionRecord],
        generated_at: NaiveDateTime,
    ) -> anyhow::Result<Vec<String>>;
}
