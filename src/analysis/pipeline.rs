use std::sync::Arc;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::analysis::report::build_report;
use crate::analysis::scoring_engine::TrustEngine;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{RepositoryReport, RepositorySnapshot};
use crate::source::{RepoRef, SnapshotSource};
use crate::storage::Storage;

/// Collect, enrich, score and persist. All I/O lives here and in the
/// source; the engine only sees finished snapshots.
pub struct AnalysisPipeline {
    source: Arc<dyn SnapshotSource>,
    engine: TrustEngine,
    storage: Storage,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(
        source: impl SnapshotSource + 'static,
        engine: TrustEngine,
        storage: Storage,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            engine,
            storage,
            config,
        }
    }

    pub async fn analyze_repository(&self, repo: &RepoRef) -> Result<RepositoryReport> {
        tracing::info!("Collecting snapshot of {} from {}", repo, self.source.name());
        let mut snapshot = self.source.fetch_snapshot(repo, &self.config).await?;
        if snapshot.repository.is_none() {
            snapshot.repository = Some(repo.full_name());
        }

        let enriched = self.enrich_contributors(&mut snapshot).await;
        tracing::info!("Enriched {} contributor profiles", enriched);

        self.analyze_snapshot(&snapshot)
    }

    /// Scores an already collected snapshot and stores the report.
    pub fn analyze_snapshot(&self, snapshot: &RepositorySnapshot) -> Result<RepositoryReport> {
        let assessment = self.engine.evaluate(snapshot);
        tracing::info!(
            "{} scored {} ({})",
            snapshot.display_name(),
            assessment.result.score,
            assessment.result.risk_level
        );

        let report = build_report(snapshot, assessment);
        self.storage.save_report(&report)?;
        tracing::info!("Report saved to database");

        Ok(report)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Fills account details for the top contributors. Lookups that fail
    /// are logged and leave the contributor unprofiled.
    async fn enrich_contributors(&self, snapshot: &mut RepositorySnapshot) -> usize {
        let mut ranked: Vec<usize> = (0..snapshot.contributors.len()).collect();
        ranked.sort_by(|a, b| {
            let (a, b) = (&snapshot.contributors[*a], &snapshot.contributors[*b]);
            b.contribution_count
                .cmp(&a.contribution_count)
                .then_with(|| a.id.cmp(&b.id))
        });

        let targets: Vec<(usize, String)> = ranked
            .into_iter()
            .take(self.config.profile_limit)
            .filter(|i| !snapshot.contributors[*i].has_profile())
            .map(|i| (i, snapshot.contributors[i].id.clone()))
            .collect();

        if targets.is_empty() {
            return 0;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));
        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(progress_style("profiles"));

        let mut profile_futures = Vec::new();

        for (index, login) in targets {
            let source = self.source.clone();
            let sem = semaphore.clone();
            let pb_clone = pb.clone();

            profile_futures.push(async move {
                let _permit = sem.acquire().await.ok()?;

                let profile = match source.fetch_profile(&login).await {
                    Ok(user) => Some((index, user)),
                    Err(e) => {
                        tracing::warn!("Profile lookup failed for {}: {}", login, e);
                        None
                    }
                };

                pb_clone.inc(1);
                profile
            });
        }

        let results = join_all(profile_futures).await;
        pb.finish_with_message("Fetched contributor profiles");

        let mut enriched = 0;
        for (index, user) in results.into_iter().flatten() {
            let contributor = &mut snapshot.contributors[index];
            contributor.account_created_at = user.created_at;
            contributor.public_repos = Some(user.public_repos);
            enriched += 1;
        }

        enriched
    }
}

fn progress_style(unit: &str) -> ProgressStyle {
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {}",
        unit
    );
    ProgressStyle::default_bar()
        .template(&template)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
