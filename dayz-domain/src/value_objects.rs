// Domain value objects
pub mod log_kind;
pub mod position;

pub use log_kind::*;
pub use position::*;
