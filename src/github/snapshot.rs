use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::client::GitHubClient;
use crate::models::github::{
    Branch, CommitSummary, ContentEntry, Contributor, GitHubRepository, GitHubUser, Issue,
    PullRequest, Workflow,
};
use crate::models::{
    BranchRecord, CommitRecord, ContributorRecord, FileEntry, IssueRecord, ParentRecord,
    PullRequestRecord, RepositorySnapshot, WorkflowEntry,
};
use crate::source::{RepoRef, SnapshotSource};

/// Raw API responses for one repository, before normalisation.
#[derive(Debug, Clone)]
pub struct RepositoryData {
    pub repository: GitHubRepository,
    pub commits: Vec<CommitSummary>,
    pub contributors: Vec<Contributor>,
    pub contents: Vec<ContentEntry>,
    pub branches: Vec<Branch>,
    pub workflows: Vec<Workflow>,
    pub issues: Vec<Issue>,
    pub pull_requests: Vec<PullRequest>,
    pub languages: BTreeMap<String, u64>,
}

impl RepositoryData {
    pub fn into_snapshot(self, captured_at: DateTime<Utc>) -> RepositorySnapshot {
        let repo = self.repository;
        // `updated_at` also moves on stars and metadata edits
        let last_push = repo.pushed_at.or(repo.updated_at);
        let mut snapshot = RepositorySnapshot::new(captured_at, repo.created_at, last_push);

        snapshot.repository = Some(repo.full_name);
        snapshot.is_fork = repo.fork;
        snapshot.parent = repo.parent.map(|p| ParentRecord {
            full_name: p.full_name,
            created_at: p.created_at,
        });
        snapshot.stars = repo.stargazers_count;
        snapshot.forks = repo.forks_count;
        snapshot.open_issues = repo.open_issues_count;
        snapshot.commits = self.commits.into_iter().map(commit_record).collect();
        snapshot.contributors = self
            .contributors
            .into_iter()
            .filter_map(contributor_record)
            .collect();
        snapshot.files = self
            .contents
            .into_iter()
            .map(|entry| FileEntry {
                name: entry.name,
                path: entry.path,
                size_bytes: entry.size,
            })
            .collect();
        snapshot.workflows = self
            .workflows
            .into_iter()
            .map(|w| WorkflowEntry::new(w.name))
            .collect();
        snapshot.branches = self
            .branches
            .into_iter()
            .map(|b| BranchRecord {
                name: b.name,
                is_protected: b.protected,
                last_commit_at: None,
            })
            .collect();
        snapshot.issues = self
            .issues
            .into_iter()
            .map(|i| IssueRecord { state: i.state })
            .collect();
        snapshot.pull_requests = self
            .pull_requests
            .into_iter()
            .map(|p| PullRequestRecord {
                state: p.state,
                merged_at: p.merged_at,
            })
            .collect();
        snapshot.languages = self.languages;

        snapshot
    }
}

/// Commits without an email fall back to the linked account login.
fn commit_record(summary: CommitSummary) -> CommitRecord {
    let author = summary.commit.author;
    let author_email = author
        .as_ref()
        .and_then(|a| a.email.clone())
        .filter(|e| !e.trim().is_empty())
        .or_else(|| summary.author.map(|a| a.login))
        .unwrap_or_default();

    CommitRecord {
        author_email,
        authored_at: author.and_then(|a| a.date),
        message: summary.commit.message,
    }
}

fn contributor_record(contributor: Contributor) -> Option<ContributorRecord> {
    let id = contributor
        .login
        .or(contributor.name)
        .filter(|id| !id.trim().is_empty())?;
    Some(ContributorRecord::new(id, contributor.contributions))
}

#[async_trait]
impl SnapshotSource for GitHubClient {
    async fn fetch_snapshot(
        &self,
        repo: &RepoRef,
        config: &PipelineConfig,
    ) -> Result<RepositorySnapshot> {
        let repository = self.get_repository(repo).await?;

        let (commits, contributors, contents, branches) = tokio::try_join!(
            self.get_commits(repo, config.max_commits),
            self.get_contributors(repo),
            self.get_root_contents(repo),
            self.get_branches(repo),
        )?;
        let (workflows, issues, pull_requests, languages) = tokio::try_join!(
            self.get_workflows(repo),
            self.get_issues(repo),
            self.get_pull_requests(repo),
            self.get_languages(repo),
        )?;

        tracing::info!(
            "Collected {}: {} commits, {} contributors, {} root entries, {} workflows",
            repository.full_name,
            commits.len(),
            contributors.len(),
            contents.len(),
            workflows.workflows.len()
        );

        let data = RepositoryData {
            repository,
            commits,
            contributors,
            contents,
            branches,
            workflows: workflows.workflows,
            issues,
            pull_requests,
            languages,
        };

        Ok(data.into_snapshot(Utc::now()))
    }

    async fn fetch_profile(&self, login: &str) -> Result<GitHubUser> {
        self.get_user(login).await
    }

    fn name(&self) -> &str {
        "github"
    }
}
