use chrono::Month;

/// The calendar months in column order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Maps a period cell (`"3"`, `"3.0"`) to its month. Anything that is not a whole number from 1
/// to 12 yields `None`.
pub fn month_from_period(period: &str) -> Option<Month> {
    let number = parse_whole_number(period)?;
    let number = u8::try_from(number).ok()?;
    Month::try_from(number).ok()
}

/// The three letter label used in column headers, e.g. `Jan`.
pub fn month_label(month: Month) -> &'static str {
    &month.name()[..3]
}

/// Zero-based column offset of `month` within a year.
pub fn month_index(month: Month) -> usize {
    month.number_from_month() as usize - 1
}

/// Parses text holding a whole number, allowing the `.0` that float columns add.
pub fn parse_whole_number(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
