use serde_json::Value;

use crate::analysis::commit_patterns::analyze_commit_patterns;
use crate::analysis::contributors::analyze_contributors;
use crate::analysis::factors::{establishment_points, FactorExtractor};
use crate::analysis::maturity::classify_maturity;
use crate::analysis::time_metrics::{calculate_time_metrics, latest_commit_at};
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::models::{
    Bonus, CommitAnalysis, ContributorSummary, FeaturePresence, MaturityTier, RepositorySnapshot,
    RiskLevel, ScoreBreakdown, ScoreResult, SubScores, TimeMetrics, TrustAssessment,
};
use crate::taxonomy::FeatureDetector;

/// Every sub-score starts here before bonuses are added.
const SUB_SCORE_BASE: u32 = 25;
const MAX_SCORE: u32 = 100;

/// Age after which a project earns the longevity bonus.
const LONGEVITY_DAYS: u64 = 730;

/// Turns a snapshot into a bounded trust score plus explanations.
///
/// The engine is a pure function of its snapshot: no I/O, no clock reads,
/// no state kept between calls.
pub struct TrustEngine {
    config: ScoringConfig,
    detector: FeatureDetector,
    factors: FactorExtractor,
}

impl TrustEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            factors: FactorExtractor::with_thresholds(config.thresholds.clone()),
            detector: FeatureDetector::new(),
            config,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn evaluate(&self, snapshot: &RepositorySnapshot) -> TrustAssessment {
        let time_metrics = calculate_time_metrics(
            snapshot.captured_at,
            snapshot.created_at,
            snapshot.updated_at,
            latest_commit_at(&snapshot.commits),
        );
        let commit_analysis = analyze_commit_patterns(&snapshot.commits);
        let contributors = analyze_contributors(&snapshot.contributors, snapshot.captured_at);
        let features = self.detector.detect(&snapshot.files, &snapshot.workflows);

        let result = self.score(
            &time_metrics,
            &commit_analysis,
            &contributors,
            &features,
            snapshot.stars,
        );

        tracing::debug!(
            "Scored {}: {} ({}) tier={} breakdown={:?}",
            snapshot.display_name(),
            result.score,
            result.risk_level,
            result.tier,
            result.breakdown
        );

        TrustAssessment {
            time_metrics,
            commit_analysis,
            contributors,
            features,
            result,
        }
    }

    /// Parses and scores a raw JSON snapshot. Fails only on an invalid shape.
    pub fn evaluate_value(&self, value: Value) -> Result<TrustAssessment> {
        let snapshot = RepositorySnapshot::from_value(value)?;
        Ok(self.evaluate(&snapshot))
    }

    pub fn evaluate_json(&self, raw: &str) -> Result<TrustAssessment> {
        let snapshot = RepositorySnapshot::from_json(raw)?;
        Ok(self.evaluate(&snapshot))
    }

    pub fn score(
        &self,
        time: &TimeMetrics,
        commits: &CommitAnalysis,
        contributors: &ContributorSummary,
        features: &FeaturePresence,
        stars: u64,
    ) -> ScoreResult {
        let contributor_points = contributor_count_points(contributors.count);
        let sub_scores = SubScores {
            activity: self.activity_score(time, commits),
            quality: self.quality_score(features),
            community: self.community_score(stars, contributors.count),
        };

        let tier = self.tier(time);
        let composite = self.composite(&sub_scores);
        let floor = self.floor(tier);
        let floored = composite.max(floor);

        let bonuses = self.bonuses(time, contributors, features, stars);
        let bonus_total = (bonuses.len() as u32).saturating_mul(self.config.bonus_points);
        let score = floored.saturating_add(bonus_total).min(MAX_SCORE) as u8;

        let breakdown = ScoreBreakdown {
            sub_scores,
            composite,
            floor,
            establishment_points: if time.age_known {
                establishment_points(time.age_days)
            } else {
                establishment_points(0)
            },
            contributor_points,
        };
        let (trust_factors, risk_factors) = self.factors.extract(&breakdown);

        ScoreResult {
            score,
            risk_level: RiskLevel::from_score(score),
            tier,
            breakdown,
            bonuses,
            trust_factors,
            risk_factors,
        }
    }

    pub fn activity_score(&self, time: &TimeMetrics, commits: &CommitAnalysis) -> u32 {
        let weeks = (time.age_days as f64 / 7.0).max(1.0);
        let weekly_rate = commits.frequency as f64 / weeks;

        clamp_sub_score(
            SUB_SCORE_BASE + recency_points(time.last_updated_days) + commit_rate_points(weekly_rate),
        )
    }

    pub fn quality_score(&self, features: &FeaturePresence) -> u32 {
        let mut documentation = 0;
        if features.has_readme {
            documentation += 15;
        }
        if features.has_contributing {
            documentation += 8;
        }
        if features.has_security_policy {
            documentation += 7;
        }

        let mut tooling = 0;
        if features.has_ci {
            tooling += 10;
        }
        if features.has_tests {
            tooling += 15;
        }
        if features.has_linter_config {
            tooling += 8;
        }
        if features.has_code_owners {
            tooling += 7;
        }

        clamp_sub_score(SUB_SCORE_BASE + documentation.min(30) + tooling.min(40))
    }

    pub fn community_score(&self, stars: u64, contributor_count: usize) -> u32 {
        clamp_sub_score(
            SUB_SCORE_BASE + star_points(stars) + contributor_count_points(contributor_count),
        )
    }

    fn composite(&self, sub: &SubScores) -> u32 {
        let w = &self.config.weights;
        let blended = w.activity * sub.activity as f64
            + w.quality * sub.quality as f64
            + w.community * sub.community as f64;

        blended.round().clamp(0.0, MAX_SCORE as f64) as u32
    }

    /// An unknown creation date is classified as the youngest tier.
    fn tier(&self, time: &TimeMetrics) -> MaturityTier {
        if time.age_known {
            classify_maturity(time.age_days)
        } else {
            MaturityTier::New
        }
    }

    /// Floor only; the tier never caps a score.
    fn floor(&self, tier: MaturityTier) -> u32 {
        tier.expected_score()
            .saturating_sub(self.config.floor_margin)
            .max(self.config.floor_minimum)
    }

    fn bonuses(
        &self,
        time: &TimeMetrics,
        contributors: &ContributorSummary,
        features: &FeaturePresence,
        stars: u64,
    ) -> Vec<Bonus> {
        let mut bonuses = Vec::new();

        if time.age_known && time.age_days > LONGEVITY_DAYS {
            bonuses.push(Bonus::LongevityBonus);
        }
        if stars > 1000 && contributors.count > 10 {
            bonuses.push(Bonus::PopularTeamBonus);
        }
        if features.has_documentation_triad() {
            bonuses.push(Bonus::DocumentationBonus);
        }
        if features.has_tests && features.has_ci {
            bonuses.push(Bonus::TestedPipelineBonus);
        }

        bonuses
    }
}

impl Default for TrustEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

fn clamp_sub_score(raw: u32) -> u32 {
    raw.min(MAX_SCORE)
}

fn recency_points(last_updated_days: u64) -> u32 {
    match last_updated_days {
        0 => 35,
        d if d <= 7 => 30,
        d if d <= 30 => 20,
        d if d <= 90 => 10,
        _ => 0,
    }
}

fn commit_rate_points(weekly_rate: f64) -> u32 {
    match weekly_rate {
        r if r >= 10.0 => 35,
        r if r >= 5.0 => 25,
        r if r >= 2.0 => 15,
        r if r >= 1.0 => 10,
        _ => 0,
    }
}

fn star_points(stars: u64) -> u32 {
    match stars {
        s if s >= 1000 => 35,
        s if s >= 500 => 30,
        s if s >= 100 => 25,
        s if s >= 50 => 20,
        s if s > 0 => 10,
        _ => 0,
    }
}

/// Contributor-count share of the community sub-score, out of 35.
pub fn contributor_count_points(count: usize) -> u32 {
    match count {
        c if c > 10 => 35,
        c if c > 5 => 30,
        c if c > 2 => 25,
        c if c > 1 => 15,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::factors::FactorThresholds;
    use crate::config::ScoreWeights;
    use crate::models::{
        CommitRecord, ContributorRecord, FileEntry, RiskFactor, TrustFactor, WorkflowEntry,
    };
    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn base_snapshot(age_days: i64, updated_days_ago: i64) -> RepositorySnapshot {
        RepositorySnapshot::new(
            now(),
            Some(now() - Duration::days(age_days)),
            Some(now() - Duration::days(updated_days_ago)),
        )
    }

    fn commits(count: usize, authors: usize, newest_days_ago: i64) -> Vec<CommitRecord> {
        (0..count)
            .map(|i| CommitRecord {
                author_email: format!("dev{}@example.com", i % authors.max(1)),
                authored_at: Some(
                    now() - Duration::days(newest_days_ago) - Duration::hours(i as i64 * 7),
                ),
                message: format!("commit {}", i),
            })
            .collect()
    }

    fn contributors(count: usize) -> Vec<ContributorRecord> {
        (0..count)
            .map(|i| ContributorRecord::new(format!("dev{}", i), 10 + i as u64))
            .collect()
    }

    fn files(names: &[&str]) -> Vec<FileEntry> {
        names.iter().map(|n| FileEntry::new(*n, 512)).collect()
    }

    /// Established, well-documented project with a large following.
    fn healthy_snapshot() -> RepositorySnapshot {
        let mut snapshot = base_snapshot(400, 2);
        snapshot.commits = commits(50, 10, 2);
        snapshot.contributors = contributors(10);
        snapshot.stars = 1200;
        snapshot.files = files(&["README.md", "LICENSE", "CONTRIBUTING.md", "src", "tests"]);
        snapshot.workflows = vec![WorkflowEntry::new("CI")];
        snapshot
    }

    #[test]
    fn test_healthy_project_scenario() {
        let assessment = TrustEngine::default().evaluate(&healthy_snapshot());
        let result = &assessment.result;

        assert_eq!(assessment.time_metrics.age_days, 400);
        assert_eq!(assessment.commit_analysis.author_count, 10);
        assert_eq!(result.tier, MaturityTier::Emerging);
        assert_eq!(result.breakdown.sub_scores.activity, 55);
        assert_eq!(result.breakdown.sub_scores.quality, 73);
        assert_eq!(result.breakdown.sub_scores.community, 90);
        assert_eq!(result.breakdown.composite, 72);
        assert_eq!(result.breakdown.floor, 50);
        assert_eq!(
            result.bonuses,
            vec![Bonus::DocumentationBonus, Bonus::TestedPipelineBonus]
        );
        assert_eq!(result.score, 82);
        assert!(matches!(result.risk_level, RiskLevel::Low | RiskLevel::VeryLow));
        assert!(result.trust_factors.contains(&TrustFactor::ActiveCommunity));
        assert!(result.trust_factors.contains(&TrustFactor::QualityStandards));
        assert!(result.trust_factors.contains(&TrustFactor::EstablishedProject));
        assert!(result.risk_factors.is_empty());
    }

    #[test]
    fn test_brand_new_single_maintainer_scenario() {
        let mut snapshot = base_snapshot(5, 1);
        snapshot.commits = commits(2, 1, 1);
        snapshot.contributors = contributors(1);
        snapshot.files = files(&["README.md"]);

        let result = TrustEngine::default().evaluate(&snapshot).result;

        assert_eq!(result.tier, MaturityTier::New);
        assert_eq!(result.breakdown.sub_scores.activity, 70);
        assert_eq!(result.breakdown.sub_scores.quality, 40);
        assert_eq!(result.breakdown.sub_scores.community, 25);
        assert_eq!(result.breakdown.floor, 40);
        assert_eq!(result.score, 46);
        assert_eq!(result.risk_level, RiskLevel::Elevated);
        assert!(result
            .risk_factors
            .contains(&RiskFactor::LimitedContributorHistory));
    }

    #[test]
    fn test_empty_history_scores_without_error() {
        let assessment = TrustEngine::default().evaluate(&base_snapshot(30, 30));

        assert!(!assessment.commit_analysis.is_consistent);
        assert!(assessment.contributors.distribution.is_empty());
        assert_eq!(assessment.contributors.total_contributions, 0);
        assert!(assessment.result.score <= 100);
        assert!(assessment.result.score >= 40);
    }

    #[test]
    fn test_new_tier_floor_holds_at_minimum_signals() {
        // Young but untouched for months: every rule takes its lowest branch.
        let snapshot = base_snapshot(200, 150);
        let result = TrustEngine::default().evaluate(&snapshot).result;

        assert_eq!(result.tier, MaturityTier::New);
        assert_eq!(result.breakdown.sub_scores.activity, 25);
        assert_eq!(result.breakdown.sub_scores.quality, 25);
        assert_eq!(result.breakdown.sub_scores.community, 25);
        assert_eq!(result.breakdown.composite, 25);
        assert_eq!(result.score, 40);
        assert!(result.risk_factors.contains(&RiskFactor::VeryLowActivity));
        assert!(result
            .risk_factors
            .contains(&RiskFactor::MissingBasicDocumentation));
    }

    #[test]
    fn test_star_threshold_is_monotonic() {
        let engine = TrustEngine::default();
        let below = engine.community_score(999, 3);
        let at = engine.community_score(1000, 3);
        assert!(at >= below);

        let mut previous = 0;
        for stars in [0, 1, 49, 50, 99, 100, 499, 500, 999, 1000, 50_000] {
            let score = engine.community_score(stars, 3);
            assert!(score >= previous, "community dropped at {} stars", stars);
            previous = score;
        }
    }

    #[test]
    fn test_commit_frequency_is_monotonic() {
        let engine = TrustEngine::default();
        let time = TimeMetrics {
            age_days: 70,
            age_known: true,
            last_updated_days: 3,
            is_active: true,
        };

        let mut previous = 0;
        for frequency in [0, 5, 10, 19, 20, 49, 50, 99, 100, 500] {
            let commits = CommitAnalysis {
                frequency,
                ..CommitAnalysis::default()
            };
            let score = engine.activity_score(&time, &commits);
            assert!(score >= previous, "activity dropped at {} commits", frequency);
            previous = score;
        }
    }

    #[test]
    fn test_score_is_bounded_and_capped() {
        let mut snapshot = base_snapshot(3000, 0);
        snapshot.commits = commits(500, 40, 0);
        snapshot.contributors = contributors(40);
        snapshot.stars = 90_000;
        snapshot.files = files(&[
            "README.md",
            "LICENSE",
            "CONTRIBUTING.md",
            "SECURITY.md",
            "CODEOWNERS",
            ".eslintrc.json",
            "tests",
        ]);
        snapshot.workflows = vec![WorkflowEntry::new("CI")];

        let result = TrustEngine::default().evaluate(&snapshot).result;
        assert_eq!(result.bonuses.len(), 4);
        assert_eq!(result.score, 100);
        assert_eq!(result.risk_level, RiskLevel::VeryLow);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let engine = TrustEngine::default();
        let snapshot = healthy_snapshot();
        let first = engine.evaluate(&snapshot);
        for _ in 0..5 {
            assert_eq!(engine.evaluate(&snapshot), first);
        }
    }

    #[test]
    fn test_alternate_weight_table() {
        let config = ScoringConfig {
            weights: ScoreWeights::new(0.0, 0.0, 1.0).unwrap(),
            ..ScoringConfig::default()
        };
        let result = TrustEngine::new(config).evaluate(&healthy_snapshot()).result;
        assert_eq!(result.breakdown.composite, 90);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_invalid_shape_is_the_only_error() {
        let engine = TrustEngine::default();
        assert!(engine.evaluate_json("42").is_err());

        let assessment = engine
            .evaluate_value(json!({
                "capturedAt": "2024-06-01T00:00:00Z",
                "createdAt": "not-a-date",
                "updatedAt": "2024-05-31T00:00:00Z",
                "stars": "lots"
            }))
            .unwrap();
        assert_eq!(assessment.result.tier, MaturityTier::New);
        assert!(assessment.result.score <= 100);
    }

    #[test]
    fn test_unknown_creation_date_never_outscores_a_young_project() {
        let engine = TrustEngine::default();
        let malformed = engine
            .evaluate_value(json!({
                "capturedAt": "2024-06-01T00:00:00Z",
                "createdAt": "garbage",
                "updatedAt": "2023-01-01T00:00:00Z"
            }))
            .unwrap();
        let young = engine
            .evaluate_value(json!({
                "capturedAt": "2024-06-01T00:00:00Z",
                "createdAt": "2024-05-01T00:00:00Z",
                "updatedAt": "2023-01-01T00:00:00Z"
            }))
            .unwrap();

        assert!(!malformed.time_metrics.age_known);
        assert!(malformed.time_metrics.age_days > 19_000);

        let result = &malformed.result;
        assert_eq!(result.tier, MaturityTier::New);
        assert_eq!(result.breakdown.floor, 40);
        assert_eq!(result.breakdown.establishment_points, 8);
        assert!(!result.bonuses.contains(&Bonus::LongevityBonus));
        assert!(!result.trust_factors.contains(&TrustFactor::EstablishedProject));
        assert!(result.score <= young.result.score);
    }

    #[test]
    fn test_factor_thresholds_come_from_config() {
        let config = ScoringConfig {
            thresholds: FactorThresholds {
                active_community: 95,
                ..FactorThresholds::default()
            },
            ..ScoringConfig::default()
        };
        let engine = TrustEngine::new(config);
        assert_eq!(engine.config().thresholds.active_community, 95);

        // community is 90 for the healthy project
        let result = engine.evaluate(&healthy_snapshot()).result;
        assert!(!result.trust_factors.contains(&TrustFactor::ActiveCommunity));

        let default = TrustEngine::default().evaluate(&healthy_snapshot()).result;
        assert!(default.trust_factors.contains(&TrustFactor::ActiveCommunity));
    }

    #[test]
    fn test_oversized_bonus_points_saturate() {
        let config = ScoringConfig {
            bonus_points: u32::MAX,
            ..ScoringConfig::default()
        };
        let result = TrustEngine::new(config).evaluate(&healthy_snapshot()).result;
        assert_eq!(result.bonuses.len(), 2);
        assert_eq!(result.score, 100);
    }
}
