use std::sync::Arc;

use dayz_domain::ports::{LogRepository, RemoteLogService, ReportRepository};
use dayz_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub log_repo: Arc<dyn LogRepository>,
    pub report_repo: Arc<dyn ReportRepository>,
    pub remote: Arc<dyn RemoteLogService>,
    pub metrics: Arc<Metrics>,
}
