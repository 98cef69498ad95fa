//! Instant helpers shared by the model and persistence layers.
//!
//! Every instant held by a goal is kept at millisecond precision so that
//! the ISO-8601 persistence form round-trips without loss.

use chrono::{DateTime, Datelike, Local, SubsecRound, Utc};

/// Current instant truncated to milliseconds.
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

/// Drops sub-millisecond precision.
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// Calendar year of `instant` in the device's local time zone.
pub fn local_year(instant: DateTime<Utc>) -> i32 {
    instant.with_timezone(&Local).year()
}
