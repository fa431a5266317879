// DayZ Application Layer

pub mod commands;
pub mod error;
pub mod metrics;
pub mod state;

pub use commands::*;
pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
