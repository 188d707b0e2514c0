use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::{
    BranchAnalysis, CommitAnalysis, ContributorSummary, EngagementMetrics, FeaturePresence,
    LanguageShare, StructureMetrics, TimeMetrics,
};
use super::score::ScoreResult;

/// Everything the engine derives from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustAssessment {
    pub time_metrics: TimeMetrics,
    pub commit_analysis: CommitAnalysis,
    pub contributors: ContributorSummary,
    pub features: FeaturePresence,
    pub result: ScoreResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryReport {
    pub repository: String,
    pub analyzed_at: DateTime<Utc>,
    pub assessment: TrustAssessment,
    pub branches: BranchAnalysis,
    pub structure: StructureMetrics,
    pub engagement: EngagementMetrics,
    pub languages: Vec<LanguageShare>,
    #[serde(default)]
    pub warnings: Vec<RepositoryWarning>,
}

/// Signs that a repository may be a copy or left behind. Shown alongside
/// the score, never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RepositoryWarning {
    #[serde(rename_all = "camelCase")]
    Fork {
        parent: Option<String>,
        days_after_original: Option<u64>,
    },
    SingleContributor,
    OnlyInitialCommits,
    HighIssueToStarRatio,
    InfrequentUpdates,
}

impl std::fmt::Display for RepositoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryWarning::Fork {
                parent,
                days_after_original,
            } => {
                write!(f, "FORK OF {}", parent.as_deref().unwrap_or("UNKNOWN"))?;
                if let Some(days) = days_after_original {
                    write!(f, ", CREATED {} DAYS AFTER ORIGINAL", days)?;
                }
                Ok(())
            }
            RepositoryWarning::SingleContributor => {
                write!(f, "SINGLE CONTRIBUTOR - POTENTIAL COPY")
            }
            RepositoryWarning::OnlyInitialCommits => {
                write!(f, "ONLY INITIAL COMMITS - POSSIBLY ABANDONED COPY")
            }
            RepositoryWarning::HighIssueToStarRatio => write!(f, "High Issue-to-Star Ratio"),
            RepositoryWarning::InfrequentUpdates => write!(f, "Infrequent Updates"),
        }
    }
}
