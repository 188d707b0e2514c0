use chrono::{DateTime, Utc};

use crate::analysis::time_metrics::days_between;
use crate::models::{BranchAnalysis, BranchRecord};

const STALE_BRANCH_DAYS: u64 = 90;

/// Branch hygiene signals. A branch with no known last commit is never stale.
pub fn analyze_branches(branches: &[BranchRecord], now: DateTime<Utc>) -> BranchAnalysis {
    let names: Vec<String> = branches.iter().map(|b| b.name.to_lowercase()).collect();

    BranchAnalysis {
        count: branches.len(),
        has_protected: branches.iter().any(|b| b.is_protected),
        has_feature_branches: names.iter().any(|n| n.starts_with("feature/")),
        has_dev_branch: names.iter().any(|n| n == "dev" || n == "develop"),
        has_release_branches: names.iter().any(|n| n.starts_with("release/")),
        stale_count: branches
            .iter()
            .filter_map(|b| b.last_commit_at)
            .filter(|at| days_between(*at, now) > STALE_BRANCH_DAYS)
            .count(),
    }
}
