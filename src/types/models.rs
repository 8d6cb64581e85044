use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Stored credential, compared verbatim on login.
    #[serde(skip)]
    pub password: String,
    /// Role string; parsed through [`crate::types::Role`] at every check.
    pub usergroup: String,
    pub created_at: DateTime<Utc>,
}

/// A PC record within one office table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pc {
    pub id: i64,
    pub hostname: String,
    pub ip: String,
    pub cpu_model: String,
    pub cpu_no: String,
    pub monitor_model: String,
    pub monitor_no: String,
    /// Space-separated rowids of the printers plugged into this PC.
    pub printer: String,
    pub user: String,
    pub department: String,
    pub notes: String,
}

/// Field set for inserting or updating a PC row.
#[derive(Debug, Clone, Default)]
pub struct NewPc {
    pub hostname: String,
    pub ip: String,
    pub cpu_model: String,
    pub cpu_no: String,
    pub monitor_model: String,
    pub monitor_no: String,
    pub printer: String,
    pub user: String,
    pub department: String,
    pub notes: String,
}

/// A printer record; addressed by its SQLite rowid within the office table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Printer {
    pub rowid: i64,
    pub model: String,
    pub serial_no: String,
    pub printer_type: String,
    pub notes: Option<String>,
    /// Id of the PC this printer is plugged into; `None` means unassigned.
    pub host: Option<i64>,
    pub nickname: String,
}

/// Field set for inserting or updating a printer row.
#[derive(Debug, Clone, Default)]
pub struct NewPrinter {
    pub model: String,
    pub serial_no: String,
    pub printer_type: String,
    pub notes: Option<String>,
    pub host: Option<i64>,
    pub nickname: String,
}

impl Pc {
    /// Parses the space-separated printer linkage field into rowids.
    /// Malformed entries are skipped.
    #[must_use]
    pub fn printer_rowids(&self) -> Vec<i64> {
        parse_printer_field(&self.printer)
    }
}

/// Parses a space-separated printer rowid list, skipping anything that is
/// not an integer.
#[must_use]
pub fn parse_printer_field(field: &str) -> Vec<i64> {
    field
        .split_whitespace()
        .filter_map(|part| part.parse().ok())
        .collect()
}
