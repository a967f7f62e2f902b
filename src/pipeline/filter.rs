use crate::model::{month_from_period, parse_whole_number, Amount, Code, FactRecord, RawFact};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::{debug, warn};

/// Which accounts make it into the budget.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountFilter {
    /// Every account in the intersections export.
    #[default]
    All,
    /// Only accounts below this member of the Account hierarchy, e.g. "Net Income" for profit
    /// and loss accounts.
    DescendantsOf(Code),
}

impl Display for AccountFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountFilter::All => write!(f, "all accounts"),
            AccountFilter::DescendantsOf(root) => write!(f, "accounts below '{root}'"),
        }
    }
}

/// The year and scenario a budget is generated for.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Selection {
    pub year: i32,
    pub scenario: String,
}

impl Selection {
    pub fn new(year: i32, scenario: impl Into<String>) -> Self {
        Self {
            year,
            scenario: scenario.into(),
        }
    }

    fn matches(&self, raw: &RawFact) -> bool {
        parse_year(&raw.year) == Some(self.year) && raw.scenario == self.scenario
    }
}

/// Row counts at each stage of the record filter.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct FilterReport {
    /// Rows in the intersections export.
    pub input: usize,
    /// Rows with the selected year and scenario.
    pub matched_selection: usize,
    /// Of those, rows whose account passed the account filter.
    pub matched_accounts: usize,
    /// Rows that survived cleaning and will be aggregated.
    pub kept: usize,
    /// Rows dropped because the period was not a month number.
    pub dropped_periods: usize,
    /// Rows dropped because the value was not a number.
    pub dropped_values: usize,
}

impl FilterReport {
    pub fn dropped(&self) -> usize {
        self.dropped_periods + self.dropped_values
    }
}

impl Display for FilterReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows read, {} matched the year and scenario, {} matched the account filter, \
            {} kept after dropping {} with an invalid period and {} with an invalid value",
            self.input,
            self.matched_selection,
            self.matched_accounts,
            self.kept,
            self.dropped_periods,
            self.dropped_values
        )
    }
}

/// Parses a year cell. `"2026"` and `"2026.0"` are both 2026.
pub fn parse_year(s: &str) -> Option<i32> {
    parse_whole_number(s).and_then(|n| i32::try_from(n).ok())
}

/// Narrows `facts` to the rows of `selection`, and to `accounts` when a membership set is given,
/// then types the period and value of each row. The scenario must match exactly, case included.
/// Rows with a bad period or value are dropped and counted rather than failing the run.
pub fn filter(
    facts: &[RawFact],
    selection: &Selection,
    accounts: Option<&BTreeSet<Code>>,
) -> (Vec<FactRecord>, FilterReport) {
    let mut report = FilterReport {
        input: facts.len(),
        ..FilterReport::default()
    };
    let mut records = Vec::new();

    for (ix, raw) in facts.iter().enumerate() {
        if !selection.matches(raw) {
            continue;
        }
        report.matched_selection += 1;

        let account = Code::new(&raw.account);
        if let Some(members) = accounts {
            if !members.contains(&account) {
                continue;
            }
        }
        report.matched_accounts += 1;

        let Some(month) = month_from_period(&raw.period) else {
            debug!("Dropping data row {}: period '{}' is not 1 to 12", ix + 1, raw.period);
            report.dropped_periods += 1;
            continue;
        };
        let value = match Amount::from_str(&raw.value) {
            Ok(value) => value,
            Err(e) => {
                debug!("Dropping data row {}: {e}", ix + 1);
                report.dropped_values += 1;
                continue;
            }
        };

        records.push(FactRecord {
            account,
            department: Code::new(&raw.department),
            year: selection.year,
            month,
            scenario: raw.scenario.clone(),
            value,
        });
    }
    report.kept = records.len();

    debug!("Record filter: {report}");
    if report.dropped_periods > 0 {
        warn!(
            "Dropped {} intersection row(s) whose period is not a month number from 1 to 12",
            report.dropped_periods
        );
    }
    if report.dropped_values > 0 {
        warn!(
            "Dropped {} intersection row(s) whose value is not a number",
            report.dropped_values
        );
    }
    (records, report)
}

/// The years and scenarios present in an intersections export.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct Available {
    /// Distinct parseable years, ascending.
    pub years: Vec<i32>,
    /// Distinct non-empty scenarios, sorted.
    pub scenarios: Vec<String>,
}

impl Available {
    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }
}

pub fn available(facts: &[RawFact]) -> Available {
    let years: BTreeSet<i32> = facts.iter().filter_map(|f| parse_year(&f.year)).collect();
    let scenarios: BTreeSet<&str> = facts
        .iter()
        .map(|f| f.scenario.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    Available {
        years: years.into_iter().collect(),
        scenarios: scenarios.into_iter().map(String::from).collect(),
    }
}
