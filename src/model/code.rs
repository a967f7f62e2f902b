use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An account or department code in canonical form.
///
/// Exports frequently carry numeric codes through a float column, so `4100` arrives as `4100.0`.
/// The canonical form trims surrounding whitespace and drops an all-zero fractional part from an
/// all-digit code. Leading zeros are kept.
///
/// Ordering: all-digit codes sort before any other code and compare by numeric magnitude (ties
/// broken by text, so `"01"` and `"1"` stay distinct). Other codes compare as text.
///
/// ```
/// # use budget_export::model::Code;
/// assert_eq!(Code::new("4100.0").as_str(), "4100");
/// assert!(Code::new("900") < Code::new("4100"));
/// assert!(Code::new("9999") < Code::new("Net Income"));
/// ```
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct Code(String);

impl Code {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(canonicalize(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the code is made only of ASCII digits.
    pub fn is_numeric(&self) -> bool {
        is_digits(&self.0)
    }
}

fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some((whole, fraction)) = trimmed.split_once('.') {
        if is_digits(whole) && !fraction.is_empty() && fraction.chars().all(|c| c == '0') {
            return whole.to_string();
        }
    }
    trimmed.to_string()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a_sig = a.trim_start_matches('0');
    let b_sig = b.trim_start_matches('0');
    a_sig
        .len()
        .cmp(&b_sig.len())
        .then_with(|| a_sig.cmp(b_sig))
        .then_with(|| a.cmp(b))
}

impl Ord for Code {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => cmp_digits(&self.0, &other.0),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Code {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for Code {
    fn from(value: &str) -> Self {
        Code::new(value)
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        Code::new(value)
    }
}

impl FromStr for Code {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Code::new(s))
    }
}

impl Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Code::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_code_is_integral() {
        assert_eq!(Code::new("4100.0").as_str(), "4100");
        assert_eq!(Code::new("4100.000").as_str(), "4100");
        assert_eq!(Code::new(" 4100 ").as_str(), "4100");
    }

    #[test]
    fn test_non_integral_codes_are_kept() {
        assert_eq!(Code::new("4100.5").as_str(), "4100.5");
        assert_eq!(Code::new("4100.").as_str(), "4100.");
        assert_eq!(Code::new("A.0").as_str(), "A.0");
        assert_eq!(Code::new("Net Income").as_str(), "Net Income");
    }

    #[test]
    fn test_leading_zeros_are_kept() {
        assert_eq!(Code::new("0420").as_str(), "0420");
        assert_ne!(Code::new("0420"), Code::new("420"));
    }

    #[test]
    fn test_numeric_ordering() {
        let mut codes: Vec<Code> = ["5000", "900", "Travel", "4100", "Admin", "10000"]
            .into_iter()
            .map(Code::new)
            .collect();
        codes.sort();
        let sorted: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(sorted, vec!["900", "4100", "5000", "10000", "Admin", "Travel"]);
    }

    #[test]
    fn test_ordering_consistent_with_equality() {
        let a = Code::new("01");
        let b = Code::new("1");
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_is_numeric() {
        assert!(Code::new("4100").is_numeric());
        assert!(Code::new("4100.0").is_numeric());
        assert!(!Code::new("4100-A").is_numeric());
        assert!(!Code::new("").is_numeric());
    }

    #[test]
    fn test_serde() {
        let code: Code = serde_json::from_str(r#""5000.0""#).unwrap();
        assert_eq!(code.as_str(), "5000");
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""5000""#);
    }
}
