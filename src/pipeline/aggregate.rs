use crate::error::BudgetError;
use crate::model::{month_index, Amount, Code, FactRecord, MONTHS};
use chrono::Month;
use serde::Serialize;
use std::collections::BTreeMap;

/// Twelve monthly values for one account of one department, plus their running total.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct MonthValues {
    months: [Amount; 12],
    total: Amount,
}

impl MonthValues {
    pub fn get(&self, month: Month) -> Amount {
        self.months[month_index(month)]
    }

    /// Adds `value` to `month`. Returns `None`, leaving the values unchanged, when either the
    /// month or the total would no longer fit in a `Decimal`.
    pub fn add(&mut self, month: Month, value: Amount) -> Option<()> {
        let ix = month_index(month);
        let sum = self.months[ix].checked_add(value)?;
        let total = self.total.checked_add(value)?;
        self.months[ix] = sum;
        self.total = total;
        Some(())
    }

    /// The annual total, always the sum of the twelve months.
    pub fn total(&self) -> Amount {
        self.total
    }

    /// `(month, value)` in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Month, Amount)> + '_ {
        MONTHS.iter().copied().zip(self.months.iter().copied())
    }
}

/// The account × month matrix of one department, rows in code order.
pub type AccountMatrix = BTreeMap<Code, MonthValues>;

/// Pivots `records` into one matrix per department. Values that share a department, account and
/// month are summed; months with no records stay zero.
///
/// # Errors
/// - `BudgetError::Overflow` when a month or an annual total is too large to represent.
pub fn aggregate(records: &[FactRecord]) -> Result<BTreeMap<Code, AccountMatrix>, BudgetError> {
    let mut departments: BTreeMap<Code, AccountMatrix> = BTreeMap::new();
    for record in records {
        departments
            .entry(record.department.clone())
            .or_default()
            .entry(record.account.clone())
            .or_default()
            .add(record.month, record.value)
            .ok_or_else(|| BudgetError::Overflow {
                department: record.department.to_string(),
                account: record.account.to_string(),
                month: record.month,
            })?;
    }
    Ok(departments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(account: &str, department: &str, month: Month, value: &str) -> FactRecord {
        FactRecord {
            account: Code::new(account),
            department: Code::new(department),
            year: 2026,
            month,
            scenario: "Plan".to_string(),
            value: Amount::from_str(value).unwrap(),
        }
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_duplicates_are_summed() {
        let records = vec![
            record("5000", "Programs", Month::March, "150.0"),
            record("5000", "Programs", Month::March, "50.0"),
        ];
        let departments = aggregate(&records).unwrap();
        let row = departments[&Code::new("Programs")][&Code::new("5000")];
        assert_eq!(row.get(Month::March), amount("200"));
        assert_eq!(row.get(Month::April), Amount::ZERO);
        assert_eq!(row.total(), amount("200"));
    }

    #[test]
    fn test_total_is_sum_of_months() {
        let records = vec![
            record("4100", "Admin", Month::January, "0.1"),
            record("4100", "Admin", Month::February, "0.2"),
            record("4100", "Admin", Month::December, "-1,000.35"),
            record("4100", "Admin", Month::June, "1e2"),
        ];
        let departments = aggregate(&records).unwrap();
        let row = departments[&Code::new("Admin")][&Code::new("4100")];
        let summed = row
            .iter()
            .try_fold(Amount::ZERO, |acc, (_, v)| acc.checked_add(v))
            .unwrap();
        assert_eq!(row.total(), summed);
        assert_eq!(row.total(), amount("-900.05"));
    }

    #[test]
    fn test_departments_and_accounts_are_ordered_by_code() {
        let records = vec![
            record("Other", "Programs", Month::May, "1"),
            record("10000", "Programs", Month::May, "1"),
            record("5000", "Programs", Month::May, "1"),
            record("5000", "Admin", Month::May, "1"),
            record("5000", "100", Month::May, "1"),
        ];
        let departments = aggregate(&records).unwrap();
        let names: Vec<&str> = departments.keys().map(Code::as_str).collect();
        assert_eq!(names, vec!["100", "Admin", "Programs"]);
        let accounts: Vec<&str> = departments[&Code::new("Programs")]
            .keys()
            .map(Code::as_str)
            .collect();
        assert_eq!(accounts, vec!["5000", "10000", "Other"]);
    }

    #[test]
    fn test_departments_do_not_mix() {
        let records = vec![
            record("5000", "Programs", Month::May, "7"),
            record("5010", "Admin", Month::May, "3"),
        ];
        let departments = aggregate(&records).unwrap();
        assert_eq!(departments.len(), 2);
        assert!(!departments[&Code::new("Programs")].contains_key(&Code::new("5010")));
        assert!(!departments[&Code::new("Admin")].contains_key(&Code::new("5000")));
    }

    #[test]
    fn test_no_records() {
        assert!(aggregate(&[]).unwrap().is_empty());
    }

    const HUGE: &str = "50000000000000000000000000000";

    #[test]
    fn test_month_overflow_is_an_error() {
        let records = vec![
            record("5000", "Programs", Month::March, HUGE),
            record("5000", "Programs", Month::March, HUGE),
        ];
        let e = aggregate(&records).unwrap_err();
        assert!(matches!(
            &e,
            BudgetError::Overflow { department, account, month: Month::March }
                if department == "Programs" && account == "5000"
        ));
        assert!(e.to_string().contains("account '5000' in department 'Programs'"), "{e}");
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let records = vec![
            record("5000", "Admin", Month::January, HUGE),
            record("5000", "Admin", Month::February, HUGE),
        ];
        assert!(matches!(
            aggregate(&records),
            Err(BudgetError::Overflow { month: Month::February, .. })
        ));
    }

    #[test]
    fn test_failed_add_leaves_values_unchanged() {
        let mut values = MonthValues::default();
        values.add(Month::May, amount(HUGE)).unwrap();
        assert_eq!(values.add(Month::May, amount(HUGE)), None);
        assert_eq!(values.get(Month::May), amount(HUGE));
        assert_eq!(values.total(), amount(HUGE));
    }
}
