//! Date arithmetic shared by the evaluators and the ledger engine.

use chrono::{DateTime, Months, NaiveDate, Utc};

/// Advances a date by whole calendar months, clamping the day to the length
/// of the target month. `2025-01-31` plus one month is `2025-02-28`;
/// `2025-12-20` plus one month rolls over to `2026-01-20`.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Whole days from `now` until midnight (UTC) of `target`, rounded up.
/// Negative means the target date has passed.
pub fn days_until(target: NaiveDate, now: DateTime<Utc>) -> i64 {
    let target_instant = target
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();
    let seconds = (target_instant - now).num_seconds();
    // Ceiling division, correct for negative differences too.
    (seconds + 86_399).div_euclid(86_400)
}

/// Parses a stored `YYYY-MM-DD` business date, tolerating a full RFC 3339
/// timestamp by taking its date component.
pub fn parse_business_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}
