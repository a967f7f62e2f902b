//! The transformation from the two uploaded tables to a logical budget workbook.
//!
//! `run` is a pure function of its inputs: schema validation, hierarchy indexing, record
//! filtering, aggregation, labelling and layout. Reading files and writing the `.xlsx` happen in
//! the `generate` command.

mod aggregate;
mod filter;
mod label;
mod validate;

pub use aggregate::{aggregate, AccountMatrix, MonthValues};
pub use filter::{available, filter, parse_year, AccountFilter, Available, FilterReport, Selection};
pub use label::{department_title, format_account, INDENT};
pub use validate::{validate, validate_facts};

use crate::config::{FactColumns, HierarchyColumns};
use crate::error::BudgetError;
use crate::model::{Amount, Code, Dimension, HierarchyIndex, HierarchyRecord, RawFact, Table};
use crate::workbook::{self, AccountRow, DepartmentSheet, Guidelines, Workbook};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Everything a run needs besides the two tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub company_name: String,
    pub budget_name: String,
    /// Replaces the computed Guidelines period text when set.
    pub fiscal_period: Option<String>,
    pub selection: Selection,
    pub accounts: AccountFilter,
    /// Title department sheets with their hierarchy alias.
    pub department_aliases: bool,
    pub fact_columns: FactColumns,
    pub hierarchy_columns: HierarchyColumns,
}

impl Settings {
    fn guidelines(&self) -> Guidelines {
        Guidelines {
            company_name: self.company_name.clone(),
            budget_name: self.budget_name.clone(),
            scenario: self.selection.scenario.clone(),
            year: self.selection.year,
            fiscal_period: self.fiscal_period.clone(),
        }
    }
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated {
    pub workbook: Workbook,
    pub departments: Vec<DepartmentSheet>,
    pub report: FilterReport,
}

impl Generated {
    /// Serializes the workbook to `.xlsx` bytes.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, BudgetError> {
        Ok(workbook::to_xlsx(&self.workbook)?)
    }
}

/// Runs the pipeline over an intersections table and a hierarchies table.
///
/// # Errors
/// - `BudgetError::Schema` when a table lacks required columns or the two were swapped. Nothing
///   else is computed in that case.
/// - `BudgetError::EmptyResult` when no intersection row survives the filter.
/// - `BudgetError::Overflow` when summed values are too large to represent.
pub fn run(
    facts: &Table,
    hierarchies: &Table,
    settings: &Settings,
) -> Result<Generated, BudgetError> {
    validate(
        &facts.column_names(),
        &hierarchies.column_names(),
        &settings.fact_columns,
        &settings.hierarchy_columns,
    )?;

    let members = HierarchyRecord::from_table(hierarchies, &settings.hierarchy_columns);
    let accounts = HierarchyIndex::build(&members, Dimension::Account);
    let departments = HierarchyIndex::build(&members, Dimension::Department);

    let membership = account_membership(&settings.accounts, &accounts);
    let raw = RawFact::from_table(facts, &settings.fact_columns);
    let (records, report) = filter(&raw, &settings.selection, membership.as_ref());
    if records.is_empty() {
        return Err(BudgetError::EmptyResult {
            year: settings.selection.year,
            scenario: settings.selection.scenario.clone(),
            accounts: settings.accounts.to_string(),
            report,
        });
    }

    let matrices = aggregate(&records)?;
    let total = matrices.len();
    let mut sheets = Vec::with_capacity(total);
    for (i, (department, matrix)) in matrices.into_iter().enumerate() {
        debug!("Building sheet {} of {total} for department '{department}'", i + 1);
        let rows: Vec<AccountRow> = matrix
            .into_iter()
            .map(|(account, values)| AccountRow {
                label: format_account(&account, &accounts),
                values,
            })
            .collect();
        let budget = rows
            .iter()
            .try_fold(Amount::ZERO, |acc, row| acc.checked_add(row.values.total()));
        match budget {
            Some(budget) => debug!("'{department}' has {} accounts totalling {budget}", rows.len()),
            None => debug!("'{department}' has {} accounts", rows.len()),
        }
        sheets.push(DepartmentSheet {
            title: department_title(&department, &departments, settings.department_aliases),
            department,
            rows,
        });
    }

    let workbook = workbook::assemble(&settings.guidelines(), &sheets);
    Ok(Generated {
        workbook,
        departments: sheets,
        report,
    })
}

fn account_membership(
    filter: &AccountFilter,
    accounts: &HierarchyIndex,
) -> Option<BTreeSet<Code>> {
    match filter {
        AccountFilter::All => None,
        AccountFilter::DescendantsOf(root) => {
            if !accounts.contains(root) {
                warn!(
                    "The account root '{root}' is not in the {} hierarchy",
                    accounts.dimension()
                );
            }
            let members = accounts.descendants(root);
            debug!("{} accounts are below '{root}'", members.len());
            Some(members)
        }
    }
}
