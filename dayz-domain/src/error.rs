use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
