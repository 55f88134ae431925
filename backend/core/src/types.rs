use std::fmt;

use serde::{Deserialize, Serialize};

/// Which source app produced the streak screenshot. Determines the target
/// sheet in the ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Mimo,
    Elevate,
}

impl Platform {
    /// Lenient parse of a model-supplied platform label. Anything that is not
    /// recognizably "Elevate" falls back to Mimo.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("elevate") {
            Platform::Elevate
        } else {
            Platform::Mimo
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Mimo => write!(f, "Mimo"),
            Platform::Elevate => write!(f, "Elevate"),
        }
    }
}

/// The name/streak/platform triple extracted from a screenshot by the vision
/// model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extraction {
    pub name: String,
    pub platform: Platform,
    pub streak: String,
}

/// One row of the ledger. Append-only: a repeat submission for the same name
/// appends a new row, it never overwrites history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerRow {
    pub name: String,
    /// Submission date, YYYY-MM-DD.
    pub date: String,
    pub streak: String,
}

impl LedgerRow {
    /// Build a row for an extraction, stamped with today's date (UTC).
    pub fn today(extraction: &Extraction) -> Self {
        Self {
            name: extraction.name.clone(),
            date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            streak: extraction.streak.clone(),
        }
    }

    /// Cell values in sheet column order.
    pub fn values(&self) -> Vec<String> {
        vec![self.name.clone(), self.date.clone(), self.streak.clone()]
    }
}

/// Outcome of a ledger write, for reporting back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    /// Sheet the row was appended to (e.g. "Sheet1").
    pub sheet: String,
    /// Whether the name already had at least one row in that sheet.
    pub returning: bool,
    /// Human-readable status line.
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parse_recognizes_elevate() {
        assert_eq!(Platform::parse("Elevate"), Platform::Elevate);
        assert_eq!(Platform::parse("elevate"), Platform::Elevate);
        assert_eq!(Platform::parse("  ELEVATE "), Platform::Elevate);
    }

    #[test]
    fn platform_parse_defaults_to_mimo() {
        assert_eq!(Platform::parse("Mimo"), Platform::Mimo);
        assert_eq!(Platform::parse("Foo"), Platform::Mimo);
        assert_eq!(Platform::parse(""), Platform::Mimo);
        assert_eq!(Platform::default(), Platform::Mimo);
    }

    #[test]
    fn ledger_row_values_in_column_order() {
        let row = LedgerRow {
            name: "Ada".into(),
            date: "2026-08-08".into(),
            streak: "43 days completed".into(),
        };
        assert_eq!(row.values(), vec!["Ada", "2026-08-08", "43 days completed"]);
    }

    #[test]
    fn ledger_row_today_is_iso_date() {
        let extraction = Extraction {
            name: "Ada".into(),
            platform: Platform::Mimo,
            streak: "5".into(),
        };
        let row = LedgerRow::today(&extraction);
        assert_eq!(row.name, "Ada");
        assert_eq!(row.streak, "5");
        // YYYY-MM-DD
        assert_eq!(row.date.len(), 10);
        assert_eq!(row.date.as_bytes()[4], b'-');
        assert_eq!(row.date.as_bytes()[7], b'-');
    }

    #[test]
    fn extraction_serializes_round_trip() {
        let extraction = Extraction {
            name: "Ada".into(),
            platform: Platform::Elevate,
            streak: "12 days completed".into(),
        };
        let json = serde_json::to_string(&extraction).unwrap();
        let back: Extraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, extraction);
    }
}
