use crate::commands::Out;
use crate::model::{RawFact, Table};
use crate::pipeline::{available, validate_facts};
use crate::{utils, Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

/// What `scan` found in an intersections export.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ScanSummary {
    pub rows: usize,
    pub years: Vec<i32>,
    pub scenarios: Vec<String>,
}

/// Checks the columns of an intersections export and lists its years and scenarios, so you can
/// pick the `--year` and `--scenario` for `generate`.
///
/// # Errors
/// - Returns an error if the file cannot be read or parsed, or if its columns are wrong.
pub async fn scan(config: &Config, intersections: &Path) -> Result<Out<ScanSummary>> {
    let bytes = utils::read_bytes(intersections).await?;
    let table = Table::from_csv(bytes.as_slice())
        .with_context(|| format!("Unable to read {}", intersections.display()))?;
    let columns = config.intersection_columns();
    validate_facts(&table.column_names(), columns, config.hierarchy_columns())?;

    let found = available(&RawFact::from_table(&table, columns));
    let summary = ScanSummary {
        rows: table.len(),
        years: found.years,
        scenarios: found.scenarios,
    };
    let message = format!(
        "{} holds {} intersection rows, years: {}, scenarios: {}",
        intersections.display(),
        summary.rows,
        list(&summary.years),
        list(&summary.scenarios),
    );
    Ok(Out::new(message, summary))
}

fn list<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
