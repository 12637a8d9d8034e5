use chrono::{DateTime, Utc};

const SECONDS_PER_HOUR: i64 = 3600;

/// Whole hours from `since` to `now`, both truncated to the hour boundary first.
/// A `since` in the future yields 0.
pub fn elapsed_hours(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = hour_index(now) - hour_index(since);
    elapsed.max(0)
}

fn hour_index(instant: DateTime<Utc>) -> i64 {
    // div_euclid floors toward negative infinity, so pre-1970 instants
    // (including the never-viewed sentinel) truncate the same way
    instant.timestamp().div_euclid(SECONDS_PER_HOUR)
}
