// Domain entities

pub mod event;
pub mod model;
pub mod suspicion;

pub use event::*;
pub use model::*;
pub use suspicion::*;
