use crate::analysis::branches::analyze_branches;
use crate::analysis::engagement::{analyze_engagement, language_breakdown};
use crate::analysis::structure::analyze_structure;
use crate::analysis::warnings::detect_warnings;
use crate::models::{RepositoryReport, RepositorySnapshot, TrustAssessment};

/// Wraps a scored assessment with the descriptive metrics and warnings that
/// do not feed the score. `analyzed_at` is the snapshot's capture time.
pub fn build_report(
    snapshot: &RepositorySnapshot,
    assessment: TrustAssessment,
) -> RepositoryReport {
    let engagement = analyze_engagement(
        &snapshot.issues,
        &snapshot.pull_requests,
        assessment.contributors.count,
        snapshot.open_issues,
        snapshot.forks,
    );

    RepositoryReport {
        repository: snapshot.display_name().to_string(),
        analyzed_at: snapshot.captured_at,
        branches: analyze_branches(&snapshot.branches, snapshot.captured_at),
        structure: analyze_structure(&snapshot.files),
        engagement,
        languages: language_breakdown(&snapshot.languages),
        warnings: detect_warnings(snapshot, &assessment.commit_analysis),
        assessment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TrustEngine;
    use crate::models::RepositoryWarning;
    use serde_json::json;

    #[test]
    fn test_report_carries_assessment_and_extras() {
        let snapshot = RepositorySnapshot::from_value(json!({
            "repository": "acme/widgets",
            "capturedAt": "2024-06-01T00:00:00Z",
            "createdAt": "2022-01-01T00:00:00Z",
            "updatedAt": "2024-05-30T00:00:00Z",
            "contributors": [{"id": "alice", "contributionCount": 4}],
            "files": [{"name": "README.md", "path": "README.md", "sizeBytes": 1024}],
            "branches": [{"name": "main", "isProtected": true}],
            "issues": [{"state": "closed"}, {"state": "open"}],
            "languages": {"Rust": 3, "Shell": 1}
        }))
        .unwrap();

        let engine = TrustEngine::default();
        let assessment = engine.evaluate(&snapshot);
        let report = build_report(&snapshot, assessment.clone());

        assert_eq!(report.repository, "acme/widgets");
        assert_eq!(report.analyzed_at, snapshot.captured_at);
        assert_eq!(report.assessment, assessment);
        assert!(report.branches.has_protected);
        assert!((report.engagement.issue_resolution_rate - 0.5).abs() < 1e-9);
        assert!((report.engagement.issues_per_contributor - 2.0).abs() < 1e-9);
        assert_eq!(report.languages[0].language, "Rust");
        assert!((report.structure.average_file_size_kb - 1.0).abs() < 1e-9);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_warnings_leave_the_score_alone() {
        let base = json!({
            "repository": "someone/widgets",
            "capturedAt": "2024-06-01T00:00:00Z",
            "createdAt": "2022-01-01T00:00:00Z",
            "updatedAt": "2024-05-30T00:00:00Z",
            "stars": 10,
            "openIssues": 40,
            "commits": [
                {"authorEmail": "solo@x.io", "authoredAt": "2023-01-01T00:00:00Z", "message": "Initial commit"}
            ]
        });
        let mut forked = base.clone();
        forked["isFork"] = json!(true);
        forked["parent"] = json!({"fullName": "acme/widgets", "createdAt": "2021-12-01T00:00:00Z"});

        let engine = TrustEngine::default();
        let plain = RepositorySnapshot::from_value(base).unwrap();
        let forked = RepositorySnapshot::from_value(forked).unwrap();
        let plain_report = build_report(&plain, engine.evaluate(&plain));
        let forked_report = build_report(&forked, engine.evaluate(&forked));

        assert_eq!(plain_report.assessment, forked_report.assessment);
        assert_eq!(plain_report.warnings.len(), 4);
        assert_eq!(forked_report.warnings.len(), 5);
        assert_eq!(
            forked_report.warnings[0],
            RepositoryWarning::Fork {
                parent: Some("acme/widgets".to_string()),
                days_after_original: Some(31),
            }
        );
    }
}
