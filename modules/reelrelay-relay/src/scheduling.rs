use std::time::Duration;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// Pluggable release-time policy. The driver only ever asks "when does the
/// next item go out"; a smarter time-of-day optimizer can replace the
/// default without touching callers.
pub trait ReleaseStrategy: Send + Sync {
    /// Release instant for the next item, strictly after `now`.
    fn next_slot(&self, now: DateTime<Utc>) -> DateTime<Utc>;
}

/// Default strategy: the top of the next hour. A placeholder, not real
/// audience intelligence.
pub struct TopOfNextHour;

impl ReleaseStrategy for TopOfNextHour {
    fn next_slot(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        next_hour_slot(now)
    }
}

/// Truncate `now` to the hour boundary and add one hour. Always strictly
/// after `now`.
pub fn next_hour_slot(now: DateTime<Utc>) -> DateTime<Utc> {
    let top = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
    top + TimeDelta::hours(1)
}

/// Non-negative wait until `target`. Zero when the slot already passed; a
/// negative sleep must never reach the timer.
pub fn wait_duration(target: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (target - now).to_std().unwrap_or(Duration::ZERO)
}
