use std::fmt;

use serde::{Deserialize, Serialize};

/// Scoping key selecting which pair of parallel PC/printer tables a request
/// operates on. Unrecognized office strings parse to `None`; callers treat
/// that as an empty result set and a no-op mutation rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Office {
    Sibu,
    Kapit,
}

impl Office {
    pub const ALL: [Office; 2] = [Office::Sibu, Office::Kapit];

    pub fn parse(s: &str) -> Option<Office> {
        match s {
            "sibu" => Some(Office::Sibu),
            "kapit" => Some(Office::Kapit),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Office::Sibu => "sibu",
            Office::Kapit => "kapit",
        }
    }

    #[must_use]
    pub const fn pc_table(self) -> &'static str {
        match self {
            Office::Sibu => "pc_sibu",
            Office::Kapit => "pc_kapit",
        }
    }

    #[must_use]
    pub const fn printer_table(self) -> &'static str {
        match self {
            Office::Sibu => "printer_sibu",
            Office::Kapit => "printer_kapit",
        }
    }
}

impl fmt::Display for Office {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_offices() {
        assert_eq!(Office::parse("sibu"), Some(Office::Sibu));
        assert_eq!(Office::parse("kapit"), Some(Office::Kapit));
    }

    #[test]
    fn test_parse_unknown_office() {
        assert_eq!(Office::parse("kuching"), None);
        assert_eq!(Office::parse(""), None);
        assert_eq!(Office::parse("Sibu"), None);
    }

    #[test]
    fn test_table_names_are_parallel() {
        for office in Office::ALL {
            assert!(office.pc_table().starts_with("pc_"));
            assert!(office.printer_table().starts_with("printer_"));
            assert!(office.pc_table().ends_with(office.as_str()));
            assert!(office.printer_table().ends_with(office.as_str()));
        }
    }
}
