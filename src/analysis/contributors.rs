use chrono::{DateTime, Utc};

use crate::analysis::time_metrics::days_between;
use crate::models::{ContributorRecord, ContributorShare, ContributorSummary};

/// Minimum account age for a profiled contributor to count as trusted.
const TRUSTED_ACCOUNT_AGE_DAYS: u64 = 90;

pub fn analyze_contributors(
    contributors: &[ContributorRecord],
    now: DateTime<Utc>,
) -> ContributorSummary {
    let total_contributions = contributors
        .iter()
        .map(|c| c.contribution_count)
        .fold(0u64, u64::saturating_add);

    let mut ranked: Vec<&ContributorRecord> = contributors.iter().collect();
    ranked.sort_by(|a, b| {
        b.contribution_count
            .cmp(&a.contribution_count)
            .then_with(|| a.id.cmp(&b.id))
    });

    let distribution: Vec<ContributorShare> = ranked
        .into_iter()
        .map(|c| ContributorShare {
            id: c.id.clone(),
            contribution_count: c.contribution_count,
            percentage: share(c.contribution_count, total_contributions),
        })
        .collect();

    let top_share = distribution.first().map(|d| d.percentage).unwrap_or(0.0);

    let profiled: Vec<&ContributorRecord> =
        contributors.iter().filter(|c| c.has_profile()).collect();
    let trusted_count = profiled
        .iter()
        .filter(|c| is_trusted_profile(c, now))
        .count();

    ContributorSummary {
        count: contributors.len(),
        total_contributions,
        distribution,
        top_share,
        profiled_count: profiled.len(),
        trusted_count,
    }
}

fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Account older than 90 days with at least one public repository.
fn is_trusted_profile(contributor: &ContributorRecord, now: DateTime<Utc>) -> bool {
    let old_enough = contributor
        .account_created_at
        .map(|created| days_between(created, now) > TRUSTED_ACCOUNT_AGE_DAYS)
        .unwrap_or(false);
    let publishes = contributor.public_repos.unwrap_or(0) > 0;

    old_enough && publishes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2024-06-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_empty_contributors() {
        let summary = analyze_contributors(&[], now());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_contributions, 0);
        assert!(summary.distribution.is_empty());
        assert_eq!(summary.top_share, 0.0);
    }

    #[test]
    fn test_zero_total_contributions() {
        let contributors = vec![ContributorRecord::new("a", 0), ContributorRecord::new("b", 0)];
        let summary = analyze_contributors(&contributors, now());
        assert_eq!(summary.count, 2);
        assert!(summary.distribution.iter().all(|d| d.percentage == 0.0));
    }

    #[test]
    fn test_distribution_order_and_percentages() {
        let contributors = vec![
            ContributorRecord::new("carol", 25),
            ContributorRecord::new("alice", 50),
            ContributorRecord::new("bob", 25),
        ];
        let summary = analyze_contributors(&contributors, now());

        let ids: Vec<_> = summary.distribution.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
        assert_eq!(summary.total_contributions, 100);
        assert!((summary.distribution[0].percentage - 50.0).abs() < 1e-9);
        assert!((summary.distribution[2].percentage - 25.0).abs() < 1e-9);
        assert!((summary.top_share - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_contribution_counts_saturate() {
        let contributors = vec![
            ContributorRecord::new("a", u64::MAX),
            ContributorRecord::new("b", 2),
        ];
        let summary = analyze_contributors(&contributors, now());
        assert_eq!(summary.total_contributions, u64::MAX);
        assert_eq!(summary.distribution[0].id, "a");
        assert!(summary.top_share <= 100.0);
        assert!(summary.distribution.iter().all(|d| d.percentage.is_finite()));
    }

    #[test]
    fn test_huge_counts_through_json_intake() {
        let assessment = crate::analysis::TrustEngine::default()
            .evaluate_value(serde_json::json!({
                "capturedAt": "2024-06-01T00:00:00Z",
                "createdAt": "2023-01-01T00:00:00Z",
                "updatedAt": "2024-05-01T00:00:00Z",
                "contributors": [
                    {"id": "a", "contributionCount": 18446744073709551615u64},
                    {"id": "b", "contributionCount": 2}
                ]
            }))
            .unwrap();
        assert_eq!(assessment.contributors.count, 2);
    }

    #[test]
    fn test_trusted_profiles() {
        let mut veteran = ContributorRecord::new("veteran", 10);
        veteran.account_created_at = Some(now() - Duration::days(2000));
        veteran.public_repos = Some(12);

        let mut fresh = ContributorRecord::new("fresh", 8);
        fresh.account_created_at = Some(now() - Duration::days(20));
        fresh.public_repos = Some(3);

        let mut lurker = ContributorRecord::new("lurker", 2);
        lurker.account_created_at = Some(now() - Duration::days(900));
        lurker.public_repos = Some(0);

        let unprofiled = ContributorRecord::new("anon", 1);

        let summary = analyze_contributors(&[veteran, fresh, lurker, unprofiled], now());
        assert_eq!(summary.profiled_count, 3);
        assert_eq!(summary.trusted_count, 1);
    }
}
