// Line-oriented ADM/RPT log parsers

mod clock;
pub mod adm;
pub mod rpt;

pub use adm::AdmParser;
pub use rpt::RptParser;
