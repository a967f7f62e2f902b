use crate::config::FactColumns;
use crate::model::{Amount, Code, Table};
use chrono::Month;
use serde::Serialize;

/// One row of the intersections export as it was read: every cell is still text. The record
/// filter turns these into `FactRecord`s.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct RawFact {
    pub account: String,
    pub department: String,
    pub year: String,
    pub period: String,
    pub scenario: String,
    pub value: String,
}

impl RawFact {
    /// Reads every row of `table`. Columns are assumed to be present; run schema validation
    /// first.
    pub fn from_table(table: &Table, columns: &FactColumns) -> Vec<RawFact> {
        table
            .rows()
            .map(|row| RawFact {
                account: row.text(&columns.account).to_string(),
                department: row.text(&columns.department).to_string(),
                year: row.text(&columns.year).to_string(),
                period: row.text(&columns.period).to_string(),
                scenario: row.text(&columns.scenario).to_string(),
                value: row.text(&columns.value).to_string(),
            })
            .collect()
    }
}

/// A cleaned intersection: a value posted to an account and department in one month of the
/// selected year and scenario.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FactRecord {
    pub account: Code,
    pub department: Code,
    pub year: i32,
    pub month: Month,
    pub scenario: String,
    pub value: Amount,
}
