//! Error types.
//!
//! The command layer reports errors with `anyhow`. The pipeline itself returns `BudgetError` so a
//! caller can tell a bad upload (`Schema`) from a selection that matched nothing (`EmptyResult`)
//! and from a fault while computing or laying out the workbook (`Overflow`, `Assembly`).

use crate::pipeline::FilterReport;
use serde::Serialize;
use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two uploaded tables a problem refers to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Intersections,
    Hierarchies,
}

serde_plain::derive_display_from_serialize!(TableKind);

/// Structural problems with the uploaded tables, detected before any processing.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SchemaError {
    #[error(
        "The {table} file is missing required column(s): {}",
        .missing.join(", ")
    )]
    MissingColumns {
        table: TableKind,
        missing: Vec<String>,
    },

    #[error(
        "The intersections and hierarchies files appear to be swapped ({detail}). Pass the \
        intersections export as --intersections and the hierarchies export as --hierarchies"
    )]
    SwappedFiles { detail: String },
}

/// Errors that stop a budget from being generated.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(
        "No intersection records remain for year {year}, scenario '{scenario}' and {accounts} \
        ({report})"
    )]
    EmptyResult {
        year: i32,
        scenario: String,
        accounts: String,
        report: FilterReport,
    },

    #[error(
        "Unable to assemble the budget workbook: the {} values of account '{account}' in \
        department '{department}' are too large to add up",
        .month.name()
    )]
    Overflow {
        department: String,
        account: String,
        month: chrono::Month,
    },

    #[error("Unable to assemble the budget workbook: {0}")]
    Assembly(#[from] rust_xlsxwriter::XlsxError),
}
