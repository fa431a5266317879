use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use dayz_domain::{
    AdmEvents, LogRepository, NitradoConfig, RemoteLogFile, RemoteLogService, ReportRepository,
    RptEvents, RuntimeConfig, ScanSettings, SuspicionRecord,
};

use crate::{AppState, Metrics};

#[derive(Debug, Clone, Default)]
pub struct FakeLogs {
    pub adm: AdmEvents,
    pub rpt: RptEvents,
}

#[derive(Default, Clone)]
pub struct Handles {
    pub patterns: Arc<Mutex<Vec<String>>>,
    pub saved: Arc<Mutex<Vec<(String, String, usize)>>>,
    pub reported: Arc<Mutex<Vec<SuspicionRecord>>>,
    pub listed_dirs: Arc<Mutex<Vec<String>>>,
}

struct FakeLogRepository {
    logs: FakeLogs,
    handles: Handles,
}

#[async_trait]
impl LogRepository for FakeLogRepository {
    async fn load_adm(&self, pattern: &str) -> anyhow::Result<AdmEvents> {
        self.handles.patterns.lock().expect("lock").push(pattern.to_string());
        Ok(self.logs.adm.clone())
    }

    async fn load_rpt(&self, pattern: &str) -> anyhow::Result<RptEvents> {
        self.handles.patterns.lock().expect("lock").push(pattern.to_string());
        Ok(self.logs.rpt.clone())
    }

    async fn save_raw(&self, dir: &str, name: &str, content: &[u8]) -> anyhow::Result<String> {
        self.handles
            .saved
            .lock()
            .expect("lock")
            .push((dir.to_string(), name.to_string(), content.len()));
        Ok(format!("{}/{}", dir, name))
    }
}

struct FakeReportRepository {
    handles: Handles,
}

#[async_trait]
impl ReportRepository for FakeReportRepository {
    async fn write_scan_report(
        &self,
        records: &[SuspicionRecord],
        _generated_at: NaiveDateTime,
    ) -> anyhow::Result<Vec<String>> {
        self.handles
            .reported
            .lock()
            .expect("lock")
            .extend(records.iter().cloned());
        Ok(vec!["output/suspicious_activities.csv".to_string()])
    }
}

struct FakeRemote {
    files: Vec<RemoteLogFile>,
    handles: Handles,
}

#[async_trait]
impl RemoteLogService for FakeRemote {
    async fn list_files(&self, directory: &str) -> anyhow::Result<Vec<RemoteLogFile>> {
        self.handles
            .listed_dirs
            .lock()
            .expect("lock")
            .push(directory.to_string());
        Ok(self.files.clone())
    }

    async fn download_file(&self, remote_path: &str) -> anyhow::Result<Vec<u8>> {
        if remote_path.contains("broken") {
            anyhow::bail!("download token rejected");
        }
        Ok(remote_path.as_bytes().to_vec())
    }
}

pub fn state_with(logs: FakeLogs, files: Vec<RemoteLogFile>) -> (AppState, Handles) {
    let handles = Handles::default();
    let state = AppState {
        config: RuntimeConfig {
            log_dir: "logs".to_string(),
            output_dir: "output".to_string(),
            scan: ScanSettings::default(),
            nitrado: NitradoConfig {
                api_token: Some("token".to_string()),
                service_id: Some("42".to_string()),
                server_id: Some("1".to_string()),
                ..NitradoConfig::default()
            },
        },
        log_repo: Arc::new(FakeLogRepository {
            logs,
            handles: handles.clone(),
        }),
        report_repo: Arc::new(FakeReportRepository {
            handles: handles.clone(),
        }),
        remote: Arc::new(FakeRemote {
            files,
            handles: handles.clone(),
        }),
        metrics: Arc::new(Metrics::default()),
    };
    (state, handles)
}
