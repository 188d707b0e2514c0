use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeMetrics {
    pub age_days: u64,
    /// False when `createdAt` was absent or malformed and `age_days`
    /// counts from the epoch.
    pub age_known: bool,
    pub last_updated_days: u64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAnalysis {
    pub frequency: usize,
    pub author_count: usize,
    pub is_consistent: bool,
    pub weekday_count: usize,
    pub weekend_count: usize,
    /// Hour of day (UTC) to commit count; hours without commits are omitted.
    pub hour_histogram: BTreeMap<u32, usize>,
    pub peak_hours: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorShare {
    pub id: String,
    pub contribution_count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorSummary {
    pub count: usize,
    pub total_contributions: u64,
    pub distribution: Vec<ContributorShare>,
    pub top_share: f64,
    pub profiled_count: usize,
    pub trusted_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePresence {
    pub has_readme: bool,
    pub has_license: bool,
    pub has_contributing: bool,
    pub has_changelog: bool,
    pub has_security_policy: bool,
    pub has_linter_config: bool,
    pub has_type_checking_config: bool,
    #[serde(rename = "hasCI")]
    pub has_ci: bool,
    pub has_tests: bool,
    pub has_code_owners: bool,
    pub has_dependabot: bool,
    pub has_code_scanning: bool,
    pub has_editor_config: bool,
    pub has_formatter_config: bool,
    pub has_git_ignore: bool,
}

impl FeaturePresence {
    pub fn has_documentation_triad(&self) -> bool {
        self.has_readme && self.has_contributing && self.has_license
    }

    pub fn security_feature_count(&self) -> usize {
        [
            self.has_security_policy,
            self.has_dependabot,
            self.has_code_scanning,
        ]
        .iter()
        .filter(|f| **f)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchAnalysis {
    pub count: usize,
    pub has_protected: bool,
    pub has_feature_branches: bool,
    pub has_dev_branch: bool,
    pub has_release_branches: bool,
    pub stale_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestFile {
    pub name: String,
    pub size_kb: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureMetrics {
    pub average_file_size_kb: f64,
    pub largest_file: Option<LargestFile>,
    pub max_directory_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub issue_resolution_rate: f64,
    pub pull_request_merge_rate: f64,
    pub issues_per_contributor: f64,
    pub open_issues: u64,
    pub forks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub bytes: u64,
    pub percentage: f64,
}
