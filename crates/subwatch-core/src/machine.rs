//! Per-cycle expiration state machine.
//!
//! Each sweep evaluates every subscription's tag snapshot against "now"
//! and produces exactly one decision. The states are derived from the
//! tags, never stored: a subscription is untracked until its `Duration`
//! contains a digit, tracked-without-date until a `Deletion Date` is
//! assigned, and thereafter judged by days remaining.
//!
//! Assigning a deletion date and acting on one are mutually exclusive
//! within a single cycle: a subscription that receives its date this sweep
//! is not also evaluated for warning or cancellation until the next sweep.
//!
//! Both notifications are guarded by persisted tags (`Notification Sent`,
//! `Cancellation Sent`) so that re-running the sweep on the same day sends
//! nothing twice.

use chrono::{NaiveDate, NaiveDateTime};

use crate::dates::{compute_deletion_date, days_until, DateFormatError};
use crate::duration::parse_duration_months;
use crate::tags::TagSet;

/// Days before the deletion date at which the warning email goes out.
pub const DEFAULT_WARN_LEAD_DAYS: i64 = 14;

/// The single action decided for one subscription in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No digit-bearing `Duration` tag; not subject to the lane at all.
    Untracked,
    /// Tracked (digits present) but the full `N month(s)` pattern is
    /// missing, so no deletion date can be derived. No-op this cycle;
    /// the malformed tag is left for manual follow-up.
    AwaitDuration,
    /// Persist a freshly computed `Deletion Date` tag.
    AssignDeletionDate {
        /// The computed date, formatted by the executor at the boundary.
        date: NaiveDate,
    },
    /// Send the warning email, then set `Notification Sent`.
    Warn {
        /// Stored deletion date, verbatim from the tag.
        deletion_date: String,
        /// Days remaining, equal to the configured lead time.
        days_remaining: i64,
    },
    /// Send the cancellation notice, then set `Cancellation Sent`.
    Cancel {
        /// Stored deletion date, verbatim from the tag.
        deletion_date: String,
    },
    /// Mid-lifecycle: nothing to do, days remaining reported for logging.
    Wait {
        /// Days until the stored deletion date (clamped at zero).
        days_remaining: i64,
    },
}

/// Evaluate one subscription's tag snapshot.
///
/// `warn_lead_days` is the exact days-remaining value that triggers the
/// warning; see [`DEFAULT_WARN_LEAD_DAYS`].
///
/// Fails only when a stored `Deletion Date` does not parse; the caller
/// reports that and skips the subscription for this cycle.
pub fn evaluate(
    tags: &TagSet,
    now: NaiveDateTime,
    warn_lead_days: i64,
) -> Result<Decision, DateFormatError> {
    if !tags.has_valid_duration() {
        return Ok(Decision::Untracked);
    }

    if let Some(deletion_date) = tags.deletion_date() {
        let days_remaining = days_until(deletion_date, now)?;

        if days_remaining == warn_lead_days && !tags.notification_sent() {
            return Ok(Decision::Warn {
                deletion_date: deletion_date.to_string(),
                days_remaining,
            });
        }
        if days_remaining == 0 && !tags.cancellation_sent() {
            return Ok(Decision::Cancel {
                deletion_date: deletion_date.to_string(),
            });
        }
        return Ok(Decision::Wait { days_remaining });
    }

    // Tracked but dateless: derive a date if the Duration parses fully.
    let duration = tags.duration().unwrap_or_default();
    match parse_duration_months(duration).and_then(|m| compute_deletion_date(m, now.date())) {
        Some(date) => Ok(Decision::AssignDeletionDate { date }),
        None => Ok(Decision::AwaitDuration),
    }
}
