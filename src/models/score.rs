use serde::{Deserialize, Serialize};

/// Age bucket used to derive the score floor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaturityTier {
    New,
    Emerging,
    Growing,
    Mature,
}

impl MaturityTier {
    /// Baseline a healthy project of this age is expected to reach.
    pub fn expected_score(&self) -> u32 {
        match self {
            MaturityTier::New => 60,
            MaturityTier::Emerging => 70,
            MaturityTier::Growing => 80,
            MaturityTier::Mature => 90,
        }
    }
}

impl std::fmt::Display for MaturityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaturityTier::New => write!(f, "New"),
            MaturityTier::Emerging => write!(f, "Emerging"),
            MaturityTier::Growing => write!(f, "Growing"),
            MaturityTier::Mature => write!(f, "Mature"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub activity: u32,
    pub quality: u32,
    pub community: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub sub_scores: SubScores,
    pub composite: u32,
    pub floor: u32,
    /// Age-derived points, out of 15.
    pub establishment_points: u32,
    /// Contributor-count share of the community sub-score, out of 35.
    pub contributor_points: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Bonus {
    LongevityBonus,
    PopularTeamBonus,
    DocumentationBonus,
    TestedPipelineBonus,
}

impl std::fmt::Display for Bonus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bonus::LongevityBonus => write!(f, "Older than two years"),
            Bonus::PopularTeamBonus => write!(f, "Popular with a large team"),
            Bonus::DocumentationBonus => write!(f, "Complete documentation"),
            Bonus::TestedPipelineBonus => write!(f, "Tests run in CI"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 85 => RiskLevel::VeryLow,
            s if s >= 70 => RiskLevel::Low,
            s if s >= 50 => RiskLevel::Moderate,
            s if s >= 30 => RiskLevel::Elevated,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Elevated => "elevated",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_low" => Ok(RiskLevel::VeryLow),
            "low" => Ok(RiskLevel::Low),
            "moderate" => Ok(RiskLevel::Moderate),
            "elevated" => Ok(RiskLevel::Elevated),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TrustFactor {
    #[serde(rename = "Established Project")]
    EstablishedProject,
    #[serde(rename = "Trusted Contributors")]
    TrustedContributors,
    #[serde(rename = "Consistent Development")]
    ConsistentDevelopment,
    #[serde(rename = "Quality Standards")]
    QualityStandards,
    #[serde(rename = "Active Community")]
    ActiveCommunity,
}

impl TrustFactor {
    pub fn label(&self) -> &'static str {
        match self {
            TrustFactor::EstablishedProject => "Established Project",
            TrustFactor::TrustedContributors => "Trusted Contributors",
            TrustFactor::ConsistentDevelopment => "Consistent Development",
            TrustFactor::QualityStandards => "Quality Standards",
            TrustFactor::ActiveCommunity => "Active Community",
        }
    }
}

impl std::fmt::Display for TrustFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskFactor {
    #[serde(rename = "Limited Contributor History")]
    LimitedContributorHistory,
    #[serde(rename = "Very Low Activity")]
    VeryLowActivity,
    #[serde(rename = "Missing Basic Documentation")]
    MissingBasicDocumentation,
}

impl RiskFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::LimitedContributorHistory => "Limited Contributor History",
            RiskFactor::VeryLowActivity => "Very Low Activity",
            RiskFactor::MissingBasicDocumentation => "Missing Basic Documentation",
        }
    }
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub tier: MaturityTier,
    pub breakdown: ScoreBreakdown,
    pub bonuses: Vec<Bonus>,
    pub trust_factors: Vec<TrustFactor>,
    pub risk_factors: Vec<RiskFactor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_buckets() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_score(85), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_score(84), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
    }

    #[test]
    fn test_labels_serialize_verbatim() {
        let json = serde_json::to_string(&vec![TrustFactor::QualityStandards]).unwrap();
        assert_eq!(json, r#"["Quality Standards"]"#);

        let json = serde_json::to_string(&RiskLevel::VeryLow).unwrap();
        assert_eq!(json, r#""very_low""#);
        assert_eq!("elevated".parse::<RiskLevel>().unwrap(), RiskLevel::Elevated);

        let json = serde_json::to_string(&MaturityTier::Emerging).unwrap();
        assert_eq!(json, r#""EMERGING""#);
    }
}
