pub mod download_commands;
pub mod scan_commands;

pub use download_commands::*;
pub use scan_commands::*;

#[cfg(test)]
pub(crate) mod test_support;
