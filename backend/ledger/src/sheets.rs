//! Spreadsheet Ledger — the system of record.
//!
//! Appends exactly one row per successful extraction to a per-platform sheet
//! inside a single Google spreadsheet. The header row is created on first
//! write and never rewritten. Writes are always appends: a repeat name gets
//! a new row, history accumulates.

use serde::Deserialize;
use tracing::info;

use streakboard_core::{Extraction, LedgerReport, LedgerRow, Platform, StreakError};

use crate::auth;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// First row of every sheet.
pub const HEADER_ROW: [&str; 3] = ["Name", "Streak Date", "Streak Number"];

pub struct SheetsLedger {
    spreadsheet_id: String,
    credentials_path: String,
    /// Per-sheet cell window (e.g. "A1:C"), prefixed with the sheet name.
    range: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

struct WritePlan {
    write_header: bool,
    returning: bool,
}

/// Sheet routing: Elevate rows land in Sheet2, everything else in Sheet1.
fn sheet_for(platform: Platform) -> &'static str {
    match platform {
        Platform::Elevate => "Sheet2",
        Platform::Mimo => "Sheet1",
    }
}

/// Decide what this write needs, from the rows currently in the sheet.
/// The name scan (exact, case-sensitive, first column, header excluded) only
/// classifies new vs returning for reporting; the write is always an append.
fn plan_write(existing: &[Vec<String>], name: &str) -> WritePlan {
    WritePlan {
        write_header: existing.is_empty(),
        returning: existing
            .iter()
            .skip(1)
            .any(|row| row.first().map(String::as_str) == Some(name)),
    }
}

impl SheetsLedger {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        credentials_path: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            credentials_path: credentials_path.into(),
            range: range.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Persist one `LedgerRow` for the extraction and report which sheet got
    /// it and whether the name was already present.
    pub async fn record(&self, extraction: &Extraction) -> Result<LedgerReport, StreakError> {
        let token = auth::fetch_access_token(&self.http, &self.credentials_path).await?;

        let sheet = sheet_for(extraction.platform);
        let range = format!("{sheet}!{}", self.range);

        let existing = self.read_rows(&token, &range).await?;
        let plan = plan_write(&existing, &extraction.name);

        if plan.write_header {
            self.write_header(&token, sheet).await?;
        }

        let row = LedgerRow::today(extraction);
        self.append_row(&token, &range, &row).await?;

        let detail = format!(
            "Appended {} to {} ({} user)",
            row.name,
            sheet,
            if plan.returning { "returning" } else { "new" }
        );
        info!("[Ledger] {}", detail);

        Ok(LedgerReport {
            sheet: sheet.to_string(),
            returning: plan.returning,
            detail,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!("{SHEETS_API}/{}/values/{range}", self.spreadsheet_id)
    }

    async fn read_rows(&self, token: &str, range: &str) -> Result<Vec<Vec<String>>, StreakError> {
        let resp = self
            .http
            .get(self.values_url(range))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StreakError::Ledger(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(StreakError::Ledger(format!("read failed: {status}: {detail}")));
        }

        let body: ValueRange = resp
            .json()
            .await
            .map_err(|e| StreakError::Ledger(e.to_string()))?;

        // Cells come back as JSON strings for RAW-written values, but a
        // hand-edited sheet can contain numbers.
        Ok(body
            .values
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect())
    }

    async fn write_header(&self, token: &str, sheet: &str) -> Result<(), StreakError> {
        info!("[Ledger] Creating header row in {}", sheet);
        let body = serde_json::json!({ "values": [HEADER_ROW] });
        let resp = self
            .http
            .put(self.values_url(&format!("{sheet}!A1")))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StreakError::Ledger(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(StreakError::Ledger(format!(
                "header write failed: {status}: {detail}"
            )));
        }
        Ok(())
    }

    async fn append_row(
        &self,
        token: &str,
        range: &str,
        row: &LedgerRow,
    ) -> Result<(), StreakError> {
        let body = serde_json::json!({ "values": [row.values()] });
        let resp = self
            .http
            .post(format!("{}:append", self.values_url(range)))
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StreakError::Ledger(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(StreakError::Ledger(format!(
                "append failed: {status}: {detail}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn elevate_routes_to_sheet2_everything_else_to_sheet1() {
        assert_eq!(sheet_for(Platform::Elevate), "Sheet2");
        assert_eq!(sheet_for(Platform::Mimo), "Sheet1");
        // Unrecognized platform labels already collapsed to Mimo at parse.
        assert_eq!(sheet_for(Platform::parse("Foo")), "Sheet1");
    }

    #[test]
    fn empty_sheet_needs_a_header_first() {
        let plan = plan_write(&[], "Ada");
        assert!(plan.write_header);
        assert!(!plan.returning);
    }

    #[test]
    fn header_only_sheet_is_a_new_user() {
        let existing = rows(&[&["Name", "Streak Date", "Streak Number"]]);
        let plan = plan_write(&existing, "Ada");
        assert!(!plan.write_header);
        assert!(!plan.returning);
    }

    #[test]
    fn matching_data_row_classifies_as_returning() {
        let existing = rows(&[
            &["Name", "Streak Date", "Streak Number"],
            &["Ada", "2026-08-07", "42 days completed"],
        ]);
        assert!(plan_write(&existing, "Ada").returning);
        assert!(!plan_write(&existing, "Grace").returning);
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let existing = rows(&[
            &["Name", "Streak Date", "Streak Number"],
            &["Ada", "2026-08-07", "42 days completed"],
        ]);
        assert!(!plan_write(&existing, "ada").returning);
    }

    #[test]
    fn header_row_never_counts_as_a_user() {
        let existing = rows(&[&["Name", "Streak Date", "Streak Number"]]);
        assert!(!plan_write(&existing, "Name").returning);
    }

    #[test]
    fn repeat_submissions_still_plan_an_append() {
        // Append-only history: a returning user changes nothing about the
        // write itself, only the report.
        let existing = rows(&[
            &["Name", "Streak Date", "Streak Number"],
            &["Ada", "2026-08-06", "41 days completed"],
            &["Ada", "2026-08-07", "42 days completed"],
        ]);
        let plan = plan_write(&existing, "Ada");
        assert!(plan.returning);
        assert!(!plan.write_header);
    }
}
