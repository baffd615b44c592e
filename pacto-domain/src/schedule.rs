//! Local reference time: review windows and calendar days.
//!
//! All local-time rules use a fixed UTC-3 offset (no DST). Functions take the
//! instant explicitly and never read the system clock.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Offset of the reference timezone from UTC, in hours
pub const UTC_OFFSET_HOURS: i32 = -3;

/// Local hours at which a review window opens
pub const REVIEW_WINDOW_HOURS: [u32; 3] = [10, 16, 22];

/// Length of each review window, in minutes
pub const REVIEW_WINDOW_MINUTES: u32 = 30;

/// Wall-clock time of `instant` in the reference timezone
pub fn to_local(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc() + Duration::hours(i64::from(UTC_OFFSET_HOURS))
}

/// Calendar day of `instant` in the reference timezone
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    to_local(instant).date()
}

/// Whether `instant` falls inside a review window
/// (local 10:00–10:29, 16:00–16:29 or 22:00–22:29)
pub fn is_review_window(instant: DateTime<Utc>) -> bool {
    let local = to_local(instant);
    REVIEW_WINDOW_HOURS.contains(&local.hour()) && local.minute() < REVIEW_WINDOW_MINUTES
}
