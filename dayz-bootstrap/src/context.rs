use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use dayz_application::{AppState, Metrics};
use dayz_infrastructure::{AppConfig, CsvReportRepository, FsLogRepository, NitradoClient};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = AppConfig::load(config_path).await?;
        let runtime_config = config.to_runtime_config();
        debug!(
            "log_dir={} output_dir={}",
            runtime_config.log_dir, runtime_config.output_dir
        );

        let log_repo = Arc::new(FsLogRepository::new()?);
        let report_repo = Arc::new(CsvReportRepository::new(&runtime_config.output_dir));
        let remote = Arc::new(NitradoClient::new(config.to_nitrado_config())?);

        let state = AppState {
            config: runtime_config,
            log_repo,
            report_repo,
            remote,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
