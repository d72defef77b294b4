//! Calendar arithmetic for deletion dates.
//!
//! Deletion dates travel through tag storage as `DD/MM/YYYY` strings; this
//! module owns that format plus the two computations the state machine
//! needs: "now plus N calendar months" and "whole days until a stored
//! date".

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};

/// External date format used in the `Deletion Date` tag.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A stored deletion date that does not parse as `DD/MM/YYYY`.
///
/// Reported, not fatal: the driver skips the subscription for this cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparseable deletion date '{value}' (expected DD/MM/YYYY)")]
pub struct DateFormatError {
    /// The offending tag value.
    pub value: String,
}

/// Compute the deletion date `months` calendar months after `today`.
///
/// Month addition is calendar-correct: day-of-month overflow clamps to the
/// last valid day of the target month (Jan 31 + 1 month = Feb 28/29).
/// Returns `None` only when the result would leave chrono's representable
/// range.
pub fn compute_deletion_date(months: u32, today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_months(Months::new(months))
}

/// Render a date in the external `DD/MM/YYYY` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole days from `now` until midnight of `deletion_date`, clamped at
/// zero. A past or present deletion date yields 0, never a negative count.
pub fn days_until(deletion_date: &str, now: NaiveDateTime) -> Result<i64, DateFormatError> {
    let date =
        NaiveDate::parse_from_str(deletion_date, DATE_FORMAT).map_err(|_| DateFormatError {
            value: deletion_date.to_string(),
        })?;
    let midnight = date.and_time(NaiveTime::MIN);
    Ok((midnight - now).num_days().max(0))
}
