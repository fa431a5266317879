use async_trait::async_trait;

use crate::entities::RemoteLogFile;

#[async_trait]
pub trait RemoteLogService: Send + Sync {
    async fn list_files(&self, directory: &str) -> anyhow::Result<Vec<RemoteLogFile>>;
    async fn download_file(&self, remote_path: &str) -> anyhow::Result<Vec<u8>>;
}
