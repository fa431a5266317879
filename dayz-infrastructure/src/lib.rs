pub mod config;
pub mod parsers;
pub mod repositories;
pub mod services;
pub mod utils;

pub use config::*;
pub use parsers::*;
pub use repositories::*;
pub use services::*;
pub use utils::*;
