pub mod nitrado_client;
pub mod report_service;

pub use nitrado_client::*;
pub use report_service::*;
