//! Business-day arithmetic for statutory response periods.
//!
//! A business day is any day that is not a Saturday or Sunday. There is no
//! holiday calendar.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// Check if an instant falls on a weekend (in UTC).
pub fn is_weekend(at: DateTime<Utc>) -> bool {
  matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Advance `start` by `days` business days.
///
/// Steps forward one calendar day at a time and counts the day only when it
/// is a weekday, stopping once `days` have been counted. The start day itself
/// never counts, and the time of day is preserved. `days == 0` returns `start`.
pub fn add_business_days(start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
  let mut current = start;
  let mut counted = 0;
  while counted < days {
    current += Duration::days(1);
    if !is_weekend(current) {
      counted += 1;
    }
  }
  current
}
