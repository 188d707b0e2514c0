use crate::models::{RiskFactor, ScoreBreakdown, TrustFactor};

/// Cut-offs for turning sub-scores into explanatory labels.
///
/// Risk cut-offs sit near 40% of each component's maximum, trust cut-offs
/// around 60-70%.
#[derive(Debug, Clone)]
pub struct FactorThresholds {
    pub established_points: u32,
    pub trusted_contributor_points: u32,
    pub consistent_activity: u32,
    pub quality_standards: u32,
    pub active_community: u32,
    pub limited_contributor_points: u32,
    pub low_activity: u32,
    pub missing_documentation: u32,
}

impl Default for FactorThresholds {
    fn default() -> Self {
        Self {
            established_points: 10,
            trusted_contributor_points: 25,
            consistent_activity: 60,
            quality_standards: 66,
            active_community: 66,
            limited_contributor_points: 14,
            low_activity: 40,
            missing_documentation: 40,
        }
    }
}

pub struct FactorExtractor {
    thresholds: FactorThresholds,
}

impl FactorExtractor {
    pub fn new() -> Self {
        Self {
            thresholds: FactorThresholds::default(),
        }
    }

    pub fn with_thresholds(thresholds: FactorThresholds) -> Self {
        Self { thresholds }
    }

    pub fn extract(&self, breakdown: &ScoreBreakdown) -> (Vec<TrustFactor>, Vec<RiskFactor>) {
        (self.trust_factors(breakdown), self.risk_factors(breakdown))
    }

    pub fn trust_factors(&self, breakdown: &ScoreBreakdown) -> Vec<TrustFactor> {
        let t = &self.thresholds;
        let sub = &breakdown.sub_scores;
        let mut factors = Vec::new();

        if breakdown.establishment_points >= t.established_points {
            factors.push(TrustFactor::EstablishedProject);
        }
        if breakdown.contributor_points >= t.trusted_contributor_points {
            factors.push(TrustFactor::TrustedContributors);
        }
        if sub.activity >= t.consistent_activity {
            factors.push(TrustFactor::ConsistentDevelopment);
        }
        if sub.quality >= t.quality_standards {
            factors.push(TrustFactor::QualityStandards);
        }
        if sub.community >= t.active_community {
            factors.push(TrustFactor::ActiveCommunity);
        }

        factors
    }

    pub fn risk_factors(&self, breakdown: &ScoreBreakdown) -> Vec<RiskFactor> {
        let t = &self.thresholds;
        let sub = &breakdown.sub_scores;
        let mut factors = Vec::new();

        if breakdown.contributor_points < t.limited_contributor_points {
            factors.push(RiskFactor::LimitedContributorHistory);
        }
        if sub.activity < t.low_activity {
            factors.push(RiskFactor::VeryLowActivity);
        }
        if sub.quality < t.missing_documentation {
            factors.push(RiskFactor::MissingBasicDocumentation);
        }

        factors
    }
}

impl Default for FactorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Age-derived points out of 15. Even a new project gets some credit.
pub fn establishment_points(age_days: u64) -> u32 {
    match age_days {
        d if d >= 365 => 15,
        d if d >= 180 => 12,
        d if d >= 90 => 10,
        _ => 8,
    }
}
