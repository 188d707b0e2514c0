use async_trait::async_trait;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::models::github::GitHubUser;
use crate::models::RepositorySnapshot;

/// Owner/name pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Accepts `owner/name` or a `github.com` URL, with or without a
    /// trailing path or `.git` suffix.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let path = strip_host(trimmed);

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next();
        let name = segments.next().map(|n| n.strip_suffix(".git").unwrap_or(n));

        match (owner, name) {
            (Some(owner), Some(name)) if is_valid_segment(owner) && is_valid_segment(name) => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::InvalidRepository(input.to_string())),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn strip_host(input: &str) -> &str {
    let without_scheme = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);

    without_scheme
        .strip_prefix("www.github.com/")
        .or_else(|| without_scheme.strip_prefix("github.com/"))
        .unwrap_or(without_scheme)
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Produces snapshots for the pipeline. Implementations own all network
/// access; the engine only ever sees the resulting snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(
        &self,
        repo: &RepoRef,
        config: &PipelineConfig,
    ) -> Result<RepositorySnapshot>;

    async fn fetch_profile(&self, login: &str) -> Result<GitHubUser>;

    fn name(&self) -> &str;
}
