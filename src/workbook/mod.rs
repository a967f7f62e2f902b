//! The logical workbook: sheets of cells laid out exactly as they will be written, but not yet
//! serialized. Keeping layout separate from the `xlsx` writer lets the pipeline be tested and
//! compared without reading spreadsheet files back.

mod xlsx;

pub use xlsx::to_xlsx;

use crate::model::{month_label, Amount, Code, RowCol, MONTHS};
use crate::pipeline::MonthValues;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// The name of the metadata sheet.
pub const GUIDELINES: &str = "Guidelines";

/// Excel keeps this name for itself in English versions.
const HISTORY: &str = "History";

/// Spreadsheet applications reject longer sheet names.
pub const MAX_SHEET_NAME: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const MIN_LABEL_WIDTH: usize = 12;
const MAX_LABEL_WIDTH: usize = 60;
const VALUE_WIDTH: f64 = 14.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(Amount),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub value: CellValue,
    pub bold: bool,
}

/// One worksheet: a sparse grid of cells keyed by zero-based position, plus column widths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<RowCol, Cell>,
    widths: BTreeMap<usize, f64>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            widths: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_text(&mut self, row: usize, col: usize, text: impl Into<String>) {
        self.insert(row, col, CellValue::Text(text.into()), false);
    }

    pub fn set_bold_text(&mut self, row: usize, col: usize, text: impl Into<String>) {
        self.insert(row, col, CellValue::Text(text.into()), true);
    }

    pub fn set_number(&mut self, row: usize, col: usize, value: Amount) {
        self.insert(row, col, CellValue::Number(value), false);
    }

    fn insert(&mut self, row: usize, col: usize, value: CellValue, bold: bool) {
        self.cells.insert(RowCol::new(row, col), Cell { value, bold });
    }

    pub fn set_width(&mut self, col: usize, width: f64) {
        self.widths.insert(col, width);
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(&RowCol::new(row, col))
    }

    /// The text at a position, if the cell holds text.
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        match self.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The number at a position, if the cell holds a number.
    pub fn number(&self, row: usize, col: usize) -> Option<Amount> {
        match self.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (RowCol, &Cell)> {
        self.cells.iter().map(|(at, cell)| (*at, cell))
    }

    pub fn widths(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.widths.iter().map(|(col, width)| (*col, *width))
    }

    /// Number of rows up to the last one holding a cell.
    pub fn row_count(&self) -> usize {
        self.cells.keys().map(|at| at.row() + 1).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }
}

/// Values written to the Guidelines sheet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Guidelines {
    pub company_name: String,
    pub budget_name: String,
    pub scenario: String,
    pub year: i32,
    /// Replaces the computed period text when set.
    pub fiscal_period: Option<String>,
}

impl Guidelines {
    pub fn period(&self) -> String {
        match &self.fiscal_period {
            Some(label) => label.clone(),
            None => format!("1 - 12 (Jan {0} - Dec {0})", self.year),
        }
    }
}

/// One labelled account row of a department sheet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AccountRow {
    pub label: String,
    pub values: MonthValues,
}

/// The computed content of one department's sheet, rows already in display order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DepartmentSheet {
    pub department: Code,
    pub title: String,
    pub rows: Vec<AccountRow>,
}

/// Lays out the Guidelines sheet followed by one sheet per department.
pub fn assemble(guidelines: &Guidelines, departments: &[DepartmentSheet]) -> Workbook {
    let mut sheets = Vec::with_capacity(departments.len() + 1);
    sheets.push(guidelines_sheet(guidelines));

    let mut taken: HashSet<String> =
        HashSet::from([GUIDELINES.to_lowercase(), HISTORY.to_lowercase()]);
    for department in departments {
        let name = unique_sheet_name(department.department.as_str(), &mut taken);
        sheets.push(department_sheet(name, department, guidelines.year));
    }
    Workbook { sheets }
}

fn guidelines_sheet(guidelines: &Guidelines) -> Sheet {
    let mut sheet = Sheet::new(GUIDELINES);
    let rows = [
        ("Company name", guidelines.company_name.clone()),
        ("Budget name", guidelines.budget_name.clone()),
        ("Budget type", "Profit and loss".to_string()),
        ("Scenario", guidelines.scenario.clone()),
        ("Year", String::new()),
        ("Period", guidelines.period()),
        ("Subdivided by", "Sub-Departments".to_string()),
    ];
    for (row, (key, value)) in rows.iter().enumerate() {
        sheet.set_text(row, 0, *key);
        if *key == "Year" {
            sheet.set_number(row, 1, Amount::new(Decimal::from(guidelines.year)));
        } else {
            sheet.set_text(row, 1, value.as_str());
        }
    }
    sheet.set_width(0, fit_width(rows.iter().map(|(key, _)| *key)));
    sheet.set_width(1, fit_width(rows.iter().map(|(_, value)| value.as_str())));
    sheet
}

fn department_sheet(name: String, department: &DepartmentSheet, year: i32) -> Sheet {
    let mut sheet = Sheet::new(name);
    sheet.set_bold_text(0, 0, department.title.as_str());

    sheet.set_text(1, 0, "Accounts");
    sheet.set_text(1, 1, "Budget totals");
    for (i, month) in MONTHS.iter().enumerate() {
        sheet.set_text(1, 2 + i, format!("{} {year}", month_label(*month)));
    }

    for (i, account) in department.rows.iter().enumerate() {
        let row = 2 + i;
        sheet.set_text(row, 0, account.label.as_str());
        let total = account.values.total();
        if !total.is_zero() {
            sheet.set_number(row, 1, total);
        }
        for (col, (_, value)) in account.values.iter().enumerate() {
            if !value.is_zero() {
                sheet.set_number(row, 2 + col, value);
            }
        }
    }

    let labels = department.rows.iter().map(|r| r.label.as_str());
    sheet.set_width(0, fit_width(labels.chain(["Accounts"])));
    for col in 1..=MONTHS.len() + 1 {
        sheet.set_width(col, VALUE_WIDTH);
    }
    sheet
}

fn fit_width<'a>(texts: impl IntoIterator<Item = &'a str>) -> f64 {
    let longest = texts
        .into_iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);
    (longest + 2).clamp(MIN_LABEL_WIDTH, MAX_LABEL_WIDTH) as f64
}

/// Makes `raw` a legal sheet name: forbidden characters become `_`, surrounding apostrophes are
/// removed, and the result is cut to `MAX_SHEET_NAME` characters.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .trim_matches('\'')
        .chars()
        .map(|c| {
            if FORBIDDEN_SHEET_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim_end_matches('\'').to_string();
    if cleaned.is_empty() {
        "Department".to_string()
    } else {
        cleaned
    }
}

fn unique_sheet_name(department: &str, taken: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(department);
    let mut name = base.clone();
    let mut n = 2;
    while taken.contains(&name.to_lowercase()) {
        let suffix = format!(" ({n})");
        let stem: String = base
            .chars()
            .take(MAX_SHEET_NAME - suffix.chars().count())
            .collect();
        name = format!("{stem}{suffix}");
        n += 1;
    }
    if name != department {
        warn!("Department '{department}' is written to the sheet named '{name}'");
    }
    taken.insert(name.to_lowercase());
    name
}

/// The conventional output file name, `QB_Budget_{budget_name}_{year}.xlsx`, with characters
/// that are not safe in a file name replaced by `_`.
pub fn output_filename(budget_name: &str, year: i32) -> String {
    let safe: String = budget_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("QB_Budget_{safe}_{year}.xlsx")
}
