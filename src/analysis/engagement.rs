use std::collections::BTreeMap;

use crate::models::{EngagementMetrics, IssueRecord, LanguageShare, PullRequestRecord};

/// Issue and pull request throughput. Ratios with an empty denominator are 0.
pub fn analyze_engagement(
    issues: &[IssueRecord],
    pull_requests: &[PullRequestRecord],
    contributor_count: usize,
    open_issues: u64,
    forks: u64,
) -> EngagementMetrics {
    let closed = issues.iter().filter(|i| i.is_closed()).count();
    let merged = pull_requests.iter().filter(|p| p.merged_at.is_some()).count();

    EngagementMetrics {
        issue_resolution_rate: ratio(closed, issues.len()),
        pull_request_merge_rate: ratio(merged, pull_requests.len()),
        issues_per_contributor: ratio(issues.len(), contributor_count),
        open_issues,
        forks,
    }
}

/// Language byte counts as shares, largest first then by name.
pub fn language_breakdown(languages: &BTreeMap<String, u64>) -> Vec<LanguageShare> {
    let total = languages.values().copied().fold(0u64, u64::saturating_add);

    let mut shares: Vec<LanguageShare> = languages
        .iter()
        .map(|(language, bytes)| LanguageShare {
            language: language.clone(),
            bytes: *bytes,
            percentage: if total == 0 {
                0.0
            } else {
                *bytes as f64 / total as f64 * 100.0
            },
        })
        .collect();

    // BTreeMap iteration already gives name order; the sort is stable
    shares.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    shares
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
