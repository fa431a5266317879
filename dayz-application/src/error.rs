use dayz_domain::ScanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
