//! Cancellation-date parsing and ordering.
//!
//! Cancel dates arrive as separator-free digit strings: 7 digits for
//! `MDDYYYY`, 8 for `MMDDYYYY`. Anything else is invalid, and invalid
//! dates order after every valid date so they sink to the bottom of
//! urgency-sorted output.

use std::cmp::Ordering;

use chrono::NaiveDate;

/// A parsed cancellation date.
///
/// Invalid or missing dates compare greater than all valid dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelDate(Option<NaiveDate>);

impl CancelDate {
    /// An invalid/missing date.
    pub fn invalid() -> Self {
        CancelDate(None)
    }

    /// Whether this wraps a real calendar date.
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// The wrapped date, when valid.
    pub fn date(&self) -> Option<NaiveDate> {
        self.0
    }
}

impl From<NaiveDate> for CancelDate {
    fn from(date: NaiveDate) -> Self {
        CancelDate(Some(date))
    }
}

impl Ord for CancelDate {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for CancelDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse a separator-free cancel date string.
///
/// Length 7 is `MDDYYYY` (single-digit month), length 8 is `MMDDYYYY`.
/// Any other length, a non-digit character, or an impossible calendar date
/// yields [`CancelDate::invalid`].
pub fn parse_cancel_date(raw: &str) -> CancelDate {
    let digits = raw.trim();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return CancelDate::invalid();
    }

    let (month, day, year) = match digits.len() {
        7 => (&digits[0..1], &digits[1..3], &digits[3..7]),
        8 => (&digits[0..2], &digits[2..4], &digits[4..8]),
        _ => return CancelDate::invalid(),
    };

    let (Ok(month), Ok(day), Ok(year)) = (
        month.parse::<u32>(),
        day.parse::<u32>(),
        year.parse::<i32>(),
    ) else {
        return CancelDate::invalid();
    };

    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => CancelDate::from(date),
        None => CancelDate::invalid(),
    }
}
