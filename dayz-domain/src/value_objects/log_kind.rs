// Log kind value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Adm,
    Rpt,
    Other,
}

impl LogKind {
    /// Classifies a file name by extension, looking through a trailing `.gz`.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        let stem = lower.strip_suffix(".gz").unwrap_or(&lower);
        if stem.ends_with(".adm") {
            LogKind::Adm
        } else if stem.ends_with(".rpt") {
            LogKind::Rpt
        } else {
            LogKind::Other
        }
    }
}
