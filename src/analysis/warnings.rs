use crate::analysis::time_metrics::{days_between, latest_commit_at};
use crate::models::{CommitAnalysis, RepositorySnapshot, RepositoryWarning};

/// Newest commit older than this reads as infrequent updates.
const INFREQUENT_UPDATE_DAYS: u64 = 180;
/// A history shorter than this that opens with an initial commit.
const INITIAL_ONLY_MAX_COMMITS: usize = 3;
/// Open issues above this share of stars.
const ISSUE_TO_STAR_RATIO: f64 = 0.1;

pub fn detect_warnings(
    snapshot: &RepositorySnapshot,
    commits: &CommitAnalysis,
) -> Vec<RepositoryWarning> {
    let mut warnings = Vec::new();

    if snapshot.is_fork {
        let parent = snapshot.parent.as_ref();
        let days_after_original = match (parent.and_then(|p| p.created_at), snapshot.created_at) {
            (Some(original), Some(created)) => Some(days_between(original, created)),
            _ => None,
        };
        warnings.push(RepositoryWarning::Fork {
            parent: parent.map(|p| p.full_name.clone()),
            days_after_original,
        });
    }

    if commits.author_count == 1 {
        warnings.push(RepositoryWarning::SingleContributor);
    }

    let opens_with_initial = snapshot
        .commits
        .first()
        .map(|c| c.message.to_lowercase().contains("initial commit"))
        .unwrap_or(false);
    if opens_with_initial && snapshot.commits.len() < INITIAL_ONLY_MAX_COMMITS {
        warnings.push(RepositoryWarning::OnlyInitialCommits);
    }

    if snapshot.open_issues as f64 > snapshot.stars as f64 * ISSUE_TO_STAR_RATIO {
        warnings.push(RepositoryWarning::HighIssueToStarRatio);
    }

    if let Some(latest) = latest_commit_at(&snapshot.commits) {
        if days_between(latest, snapshot.captured_at) > INFREQUENT_UPDATE_DAYS {
            warnings.push(RepositoryWarning::InfrequentUpdates);
        }
    }

    warnings
}
