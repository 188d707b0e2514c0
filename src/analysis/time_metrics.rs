use chrono::{DateTime, Utc};

use crate::models::{CommitRecord, TimeMetrics};

/// Days without an update before a repository stops counting as active.
const ACTIVE_WINDOW_DAYS: u64 = 90;

/// Stand-in for a missing or malformed timestamp. Yields the maximal age.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Whole days from `then` to `now`, clamped at zero for future dates.
pub fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - then).num_days().max(0) as u64
}

pub fn calculate_time_metrics(
    now: DateTime<Utc>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    latest_commit_at: Option<DateTime<Utc>>,
) -> TimeMetrics {
    let created = created_at.unwrap_or_else(epoch);
    let updated = updated_at.unwrap_or_else(epoch);
    let last_activity = match latest_commit_at {
        Some(commit) if commit > updated => commit,
        _ => updated,
    };

    let age_days = days_between(created, now);
    let last_updated_days = days_between(last_activity, now);

    TimeMetrics {
        age_days,
        age_known: created_at.is_some(),
        last_updated_days,
        is_active: last_updated_days < ACTIVE_WINDOW_DAYS,
    }
}

/// Newest parseable commit timestamp. Does not rely on input ordering.
pub fn latest_commit_at(commits: &[CommitRecord]) -> Option<DateTime<Utc>> {
    commits.iter().filter_map(|c| c.authored_at).max()
}
