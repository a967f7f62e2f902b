//! Amount type for values coerced out of the intersections export.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may include a dollar sign, commas, scientific notation, or accounting-style parentheses.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary value.
///
/// Parsing is lenient about presentation but strict about content: an empty cell or text that is
/// not a number is an error, never zero.
///
/// # Examples
///
/// ```
/// # use budget_export::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,250.50").unwrap();
/// assert_eq!(amount.to_string(), "-$1,250.50");
/// assert_eq!(Amount::from_str("(40)").unwrap().to_string(), "-$40.00");
/// assert!(Amount::from_str("").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The sum of two amounts, or `None` when it does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// The value as a float, for writing numeric spreadsheet cells.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError(String::from("An empty value is not a number")));
        }

        // Accounting negatives: "(40.00)"
        let (negate, inner) = match trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => (true, inner.trim()),
            None => (false, trimmed),
        };

        let (sign, unsigned) = match inner.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", inner),
        };
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);
        let cleaned = format!("{sign}{}", unsigned.replace(',', ""));

        let value = Decimal::from_str(&cleaned)
            .or_else(|_| Decimal::from_scientific(&cleaned))
            .map_err(|e| AmountError(format!("'{trimmed}' is not a number: {e}")))?;

        Ok(Amount(if negate { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().to_f64().unwrap_or_default();
        write!(f, "{sign}${}", format_num::format_num!(",.2", num))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(Amount::from_str("150.0").unwrap().value(), dec("150.0"));
        assert_eq!(Amount::from_str("-50").unwrap().value(), dec("-50"));
    }

    #[test]
    fn test_parse_with_dollar_sign_and_commas() {
        assert_eq!(Amount::from_str("$1,000.00").unwrap().value(), dec("1000"));
        assert_eq!(
            Amount::from_str("-$60,000.00").unwrap().value(),
            dec("-60000")
        );
    }

    #[test]
    fn test_parse_parentheses() {
        assert_eq!(Amount::from_str("(1,234.56)").unwrap().value(), dec("-1234.56"));
        assert_eq!(Amount::from_str("( 40 )").unwrap().value(), dec("-40"));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(Amount::from_str("1.5e3").unwrap().value(), dec("1500"));
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(Amount::from_str("  75.5  ").unwrap().value(), dec("75.5"));
    }

    #[test]
    fn test_empty_is_error() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
    }

    #[test]
    fn test_text_is_error() {
        let e = Amount::from_str("n/a").unwrap_err();
        assert!(e.to_string().contains("'n/a' is not a number"));
        assert!(Amount::from_str("NaN").is_err());
        assert!(Amount::from_str("$").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec("50")).to_string(), "$50.00");
        assert_eq!(Amount::new(dec("-50")).to_string(), "-$50.00");
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
        assert_eq!(Amount::new(dec("1234567.891")).to_string(), "$1,234,567.89");
    }

    #[test]
    fn test_checked_add_is_exact() {
        let total = ["0.1", "0.2", "0.3"]
            .map(|s| Amount::from_str(s).unwrap())
            .into_iter()
            .try_fold(Amount::ZERO, Amount::checked_add)
            .unwrap();
        assert_eq!(total.value(), dec("0.6"));
    }

    #[test]
    fn test_checked_add_overflow() {
        let big = Amount::from_str("50000000000000000000000000000").unwrap();
        assert_eq!(big.checked_add(big), None);
        assert_eq!(big.checked_add(Amount::new(-big.value())), Some(Amount::ZERO));
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::from_str("$75.50").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"75.50\"");
    }

    #[test]
    fn test_zero_is_not_negative() {
        let zero = Amount::from_str("-0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
    }
}
