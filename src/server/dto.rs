use serde::Deserialize;

use crate::types::{NewPc, NewPrinter};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    /// Target account. Empty means the acting user's own account.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct NewUserForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub usergroup: String,
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PcForm {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub cpu_model: String,
    #[serde(default)]
    pub cpu_no: String,
    #[serde(default)]
    pub monitor_model: String,
    #[serde(default)]
    pub monitor_no: String,
    /// Space-separated printer rowids; absent when no printer is linked.
    #[serde(default)]
    pub printer: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PrinterForm {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_no: String,
    #[serde(default)]
    pub printer_type: String,
    #[serde(default)]
    pub notes: String,
    /// Host PC id; empty means unassigned.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub nickname: String,
}

impl From<PcForm> for NewPc {
    fn from(form: PcForm) -> Self {
        NewPc {
            hostname: form.hostname,
            ip: form.ip,
            cpu_model: form.cpu_model,
            cpu_no: form.cpu_no,
            monitor_model: form.monitor_model,
            monitor_no: form.monitor_no,
            printer: form.printer,
            user: form.user,
            department: form.department,
            notes: form.notes,
        }
    }
}

impl PrinterForm {
    /// Parses the host field; a malformed id is treated as unassigned.
    #[must_use]
    pub fn host_id(&self) -> Option<i64> {
        self.host.trim().parse().ok()
    }
}

impl From<PrinterForm> for NewPrinter {
    fn from(form: PrinterForm) -> Self {
        let host = form.host_id();
        NewPrinter {
            model: form.model,
            serial_no: form.serial_no,
            printer_type: form.printer_type,
            notes: if form.notes.is_empty() {
                None
            } else {
                Some(form.notes)
            },
            host,
            nickname: form.nickname,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printer_form_host_parsing() {
        let mut form = PrinterForm::default();
        assert_eq!(form.host_id(), None);
        form.host = " 12 ".to_string();
        assert_eq!(form.host_id(), Some(12));
        form.host = "abc".to_string();
        assert_eq!(form.host_id(), None);
    }

    #[test]
    fn test_empty_notes_become_null() {
        let printer: NewPrinter = PrinterForm::default().into();
        assert_eq!(printer.notes, None);
    }
}
