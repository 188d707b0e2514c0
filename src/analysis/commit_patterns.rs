use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Timelike, Weekday};

use crate::models::{CommitAnalysis, CommitRecord};

const PEAK_HOUR_COUNT: usize = 3;

/// Summarizes frequency, author diversity and when in the day/week work lands.
///
/// Commits whose timestamp could not be parsed still count towards
/// `frequency`, but are left out of the temporal buckets.
pub fn analyze_commit_patterns(commits: &[CommitRecord]) -> CommitAnalysis {
    if commits.is_empty() {
        return CommitAnalysis::default();
    }

    let authors: HashSet<String> = commits
        .iter()
        .map(|c| c.author_email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect();

    let mut hour_histogram: BTreeMap<u32, usize> = BTreeMap::new();
    let mut weekday_count = 0;
    let mut weekend_count = 0;

    for authored_at in commits.iter().filter_map(|c| c.authored_at) {
        *hour_histogram.entry(authored_at.hour()).or_insert(0) += 1;

        match authored_at.weekday() {
            Weekday::Sat | Weekday::Sun => weekend_count += 1,
            _ => weekday_count += 1,
        }
    }

    let peak_hours = peak_hours(&hour_histogram, PEAK_HOUR_COUNT);

    CommitAnalysis {
        frequency: commits.len(),
        author_count: authors.len(),
        is_consistent: true,
        weekday_count,
        weekend_count,
        hour_histogram,
        peak_hours,
    }
}

/// Top `k` hours by commit count; equal counts resolve to the earlier hour.
pub fn peak_hours(histogram: &BTreeMap<u32, usize>, k: usize) -> Vec<u32> {
    let mut hours: Vec<(u32, usize)> = histogram.iter().map(|(h, c)| (*h, *c)).collect();
    hours.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    hours.into_iter().take(k).map(|(hour, _)| hour).collect()
}
