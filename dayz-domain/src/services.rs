// Domain services

pub mod scanner;

pub use scanner::*;
