use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use crate::error::{Error, Result};

/// Top-level keys that must be present for a snapshot to be scored.
const REQUIRED_FIELDS: [&str; 3] = ["capturedAt", "createdAt", "updatedAt"];

/// Immutable bundle of repository facts handed to the engine.
///
/// `captured_at` is the reference instant for every "days since"
/// computation; the engine never reads the wall clock itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(deserialize_with = "lenient::required_timestamp")]
    pub captured_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Newest first.
    #[serde(default, deserialize_with = "lenient::list")]
    pub commits: Vec<CommitRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub contributors: Vec<ContributorRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub files: Vec<FileEntry>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub workflows: Vec<WorkflowEntry>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub stars: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub forks: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub open_issues: u64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub branches: Vec<BranchRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub issues: Vec<IssueRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub pull_requests: Vec<PullRequestRecord>,
    #[serde(default, deserialize_with = "lenient::count_map")]
    pub languages: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_fork: bool,
    /// Upstream repository of a fork, when known.
    #[serde(default, deserialize_with = "lenient::optional")]
    pub parent: Option<ParentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub author_email: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub authored_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub contribution_count: u64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub account_created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub public_repos: Option<u64>,
}

impl ContributorRecord {
    pub fn new(id: impl Into<String>, contribution_count: u64) -> Self {
        Self {
            id: id.into(),
            contribution_count,
            account_created_at: None,
            public_repos: None,
        }
    }

    pub fn has_profile(&self) -> bool {
        self.account_created_at.is_some() || self.public_repos.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub path: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub size_bytes: u64,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            size_bytes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
}

impl WorkflowEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_protected: bool,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_commit_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: String,
}

impl IssueRecord {
    pub fn is_closed(&self) -> bool {
        self.state.eq_ignore_ascii_case("closed")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl RepositorySnapshot {
    /// An empty snapshot; collections are filled in by the caller.
    pub fn new(
        captured_at: DateTime<Utc>,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            repository: None,
            captured_at,
            created_at,
            updated_at,
            commits: Vec::new(),
            contributors: Vec::new(),
            files: Vec::new(),
            workflows: Vec::new(),
            stars: 0,
            forks: 0,
            open_issues: 0,
            branches: Vec::new(),
            issues: Vec::new(),
            pull_requests: Vec::new(),
            languages: BTreeMap::new(),
            is_fork: false,
            parent: None,
        }
    }

    /// Validates the top-level shape and deserializes leniently.
    ///
    /// Only a non-object value, a missing required key, or an unusable
    /// `capturedAt` is rejected; everything below the top level degrades.
    pub fn from_value(value: Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidSnapshot("expected a JSON object".to_string()))?;

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|k| !object.contains_key(**k)) {
            return Err(Error::InvalidSnapshot(format!(
                "missing required field `{}`",
                missing
            )));
        }

        serde_json::from_value(value).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        Self::from_value(value)
    }

    /// Full name when known, else a placeholder.
    pub fn display_name(&self) -> &str {
        self.repository.as_deref().unwrap_or("unnamed repository")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object() {
        let err = RepositorySnapshot::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));

        let err = RepositorySnapshot::from_json("null").unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let err = RepositorySnapshot::from_value(json!({
            "capturedAt": "2024-06-01T00:00:00Z",
            "createdAt": "2023-01-01T00:00:00Z"
        }))
        .unwrap_err();
        match err {
            Error::InvalidSnapshot(msg) => assert!(msg.contains("updatedAt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_unusable_capture_time() {
        let err = RepositorySnapshot::from_value(json!({
            "capturedAt": "not a date",
            "createdAt": "2023-01-01T00:00:00Z",
            "updatedAt": "2023-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn test_degraded_fields_are_absorbed() {
        let snapshot = RepositorySnapshot::from_value(json!({
            "repository": "acme/widgets",
            "capturedAt": "2024-06-01T00:00:00Z",
            "createdAt": "garbage",
            "updatedAt": null,
            "stars": "many",
            "forks": -3,
            "openIssues": 4,
            "commits": [
                {"authorEmail": "a@x.io", "authoredAt": "2024-05-30T10:00:00Z", "message": "fix"},
                "not a commit",
                {"authorEmail": "b@x.io", "authoredAt": 12345}
            ],
            "contributors": [{"id": "alice", "contributionCount": 10}, {"contributionCount": 3}],
            "files": {"README.md": true}
        }))
        .unwrap();

        assert_eq!(snapshot.repository.as_deref(), Some("acme/widgets"));
        assert!(snapshot.created_at.is_none());
        assert!(snapshot.updated_at.is_none());
        assert_eq!(snapshot.stars, 0);
        assert_eq!(snapshot.forks, 0);
        assert_eq!(snapshot.open_issues, 4);
        assert_eq!(snapshot.commits.len(), 2);
        assert!(snapshot.commits[1].authored_at.is_none());
        assert_eq!(snapshot.contributors.len(), 1);
        assert!(snapshot.files.is_empty());
        assert!(!snapshot.is_fork);
        assert!(snapshot.parent.is_none());
    }

    #[test]
    fn test_fork_parent_intake() {
        let snapshot = RepositorySnapshot::from_value(json!({
            "capturedAt": "2024-06-01T00:00:00Z",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "isFork": true,
            "parent": {"fullName": "upstream/widgets", "createdAt": "2019-01-01T00:00:00Z"}
        }))
        .unwrap();
        assert!(snapshot.is_fork);
        let parent = snapshot.parent.unwrap();
        assert_eq!(parent.full_name, "upstream/widgets");
        assert!(parent.created_at.is_some());

        let garbled = RepositorySnapshot::from_value(json!({
            "capturedAt": "2024-06-01T00:00:00Z",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "isFork": "yes",
            "parent": "upstream/widgets"
        }))
        .unwrap();
        assert!(!garbled.is_fork);
        assert!(garbled.parent.is_none());
    }
}
