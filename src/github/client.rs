use std::collections::BTreeMap;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::{seconds_until, RateLimiter};
use crate::models::github::{
    Branch, CommitSummary, ContentEntry, Contributor, GitHubRepository, GitHubUser, Issue,
    PullRequest, WorkflowList,
};
use crate::source::RepoRef;

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Page size and cap for the auxiliary lists (branches, issues, pulls).
const LIST_PAGE_SIZE: u32 = 100;

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    /// Without a token requests are unauthenticated and share the much
    /// smaller anonymous quota.
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: Option<&str>, base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("repotrust/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_repository(&self, repo: &RepoRef) -> Result<GitHubRepository> {
        let url = self.repo_url(repo, "");
        tracing::info!("Fetching repository: {}", repo);

        let response = self.send(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::RepoNotFound(repo.full_name()));
        }

        let response = check_status(response, &url).await?;
        Ok(response.json().await?)
    }

    /// Newest first, at most `max_commits`. An empty repository yields none.
    pub async fn get_commits(
        &self,
        repo: &RepoRef,
        max_commits: u32,
    ) -> Result<Vec<CommitSummary>> {
        let url = self.repo_url(repo, "/commits");
        tracing::debug!("Fetching commits for: {}", repo);

        match self.paginator().fetch_limited(&url, 100, max_commits).await {
            Err(Error::HttpStatus { status: 409, .. }) => {
                tracing::warn!("{} has no commits yet", repo);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    pub async fn get_contributors(&self, repo: &RepoRef) -> Result<Vec<Contributor>> {
        let url = self.repo_url(repo, "/contributors");
        tracing::debug!("Fetching contributors for: {}", repo);
        match self.paginator().fetch_limited(&url, 100, LIST_PAGE_SIZE).await {
            // Very large histories make GitHub refuse to compute the list
            Err(Error::HttpStatus { status, .. }) if status == 403 || status == 204 => {
                tracing::warn!("Contributor list unavailable for {} ({})", repo, status);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Root directory listing only.
    pub async fn get_root_contents(&self, repo: &RepoRef) -> Result<Vec<ContentEntry>> {
        let url = self.repo_url(repo, "/contents");
        tracing::debug!("Fetching root contents for: {}", repo);

        let response = self.send(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let response = check_status(response, &url).await?;
        Ok(response.json().await?)
    }

    pub async fn get_branches(&self, repo: &RepoRef) -> Result<Vec<Branch>> {
        let url = self.repo_url(repo, "/branches");
        self.paginator()
            .fetch_limited(&url, LIST_PAGE_SIZE, LIST_PAGE_SIZE)
            .await
    }

    /// Actions may be disabled or hidden; any failure reads as no workflows.
    pub async fn get_workflows(&self, repo: &RepoRef) -> Result<WorkflowList> {
        let url = self.repo_url(repo, "/actions/workflows");
        match self.get_json::<WorkflowList>(&url).await {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!("Workflows unavailable for {}: {}", repo, e);
                Ok(WorkflowList {
                    total_count: 0,
                    workflows: Vec::new(),
                })
            }
        }
    }

    /// Issues proper; the endpoint's pull request entries are dropped.
    pub async fn get_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>> {
        let url = self.repo_url(repo, "/issues?state=all");
        let issues: Vec<Issue> = self
            .paginator()
            .fetch_limited(&url, LIST_PAGE_SIZE, LIST_PAGE_SIZE)
            .await?;
        Ok(issues.into_iter().filter(|i| !i.is_pull_request()).collect())
    }

    pub async fn get_pull_requests(&self, repo: &RepoRef) -> Result<Vec<PullRequest>> {
        let url = self.repo_url(repo, "/pulls?state=all");
        self.paginator()
            .fetch_limited(&url, LIST_PAGE_SIZE, LIST_PAGE_SIZE)
            .await
    }

    pub async fn get_languages(&self, repo: &RepoRef) -> Result<BTreeMap<String, u64>> {
        let url = self.repo_url(repo, "/languages");
        let response = self.send(&url).await?;

        if !response.status().is_success() {
            return Ok(BTreeMap::new());
        }

        Ok(response.json().await?)
    }

    pub async fn get_user(&self, login: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.base_url, login);
        tracing::debug!("Fetching user: {}", login);
        self.get_json(&url).await
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    fn paginator(&self) -> Paginator<'_> {
        Paginator::new(&self.client, &self.rate_limiter)
    }

    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!("{}/repos/{}/{}{}", self.base_url, repo.owner, repo.name, suffix)
    }

    async fn send(&self, url: &str) -> Result<Response> {
        self.rate_limiter.wait().await;
        let response = self.client.get(url).send().await?;
        self.rate_limiter.update_from_headers(response.headers()).await;
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(url).await?;
        let response = check_status(response, url).await?;
        Ok(response.json().await?)
    }
}

/// Maps a non-success response to an error; quota exhaustion becomes
/// `RateLimited` with the seconds until reset.
pub(crate) async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() && status != StatusCode::NO_CONTENT {
        return Ok(response);
    }

    let quota_exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "0")
        .unwrap_or(false);

    let throttled = matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS);
    if quota_exhausted && throttled {
        let reset = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(seconds_until)
            .unwrap_or(60);
        return Err(Error::RateLimited(reset));
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::HttpStatus {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}
