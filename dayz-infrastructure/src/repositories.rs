pub mod log_files;
pub mod report_files;

pub use log_files::*;
pub use report_files::*;
