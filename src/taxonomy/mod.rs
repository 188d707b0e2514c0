pub mod artifacts;

use crate::models::{FeaturePresence, FileEntry, WorkflowEntry};

pub use artifacts::{Artifact, ArtifactRule, Listing, MatchRule, ARTIFACT_RULES};

/// Evaluates a rule table against the root listing and workflow names.
pub struct FeatureDetector {
    rules: &'static [ArtifactRule],
}

impl FeatureDetector {
    pub fn new() -> Self {
        Self {
            rules: ARTIFACT_RULES,
        }
    }

    pub fn with_rules(rules: &'static [ArtifactRule]) -> Self {
        Self { rules }
    }

    pub fn detect(&self, files: &[FileEntry], workflows: &[WorkflowEntry]) -> FeaturePresence {
        let mut presence = FeaturePresence::default();

        for rule in self.rules {
            let hit = match rule.listing {
                Listing::Files => files.iter().any(|f| rule.rule.matches(&f.name)),
                Listing::Workflows => workflows.iter().any(|w| rule.rule.matches(&w.name)),
            };

            if hit {
                tracing::trace!("Detected {:?} via {:?}", rule.artifact, rule.rule);
                mark(&mut presence, rule.artifact);
            }
        }

        presence
    }
}

impl Default for FeatureDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn flag_mut(presence: &mut FeaturePresence, artifact: Artifact) -> &mut bool {
    match artifact {
        Artifact::Readme => &mut presence.has_readme,
        Artifact::License => &mut presence.has_license,
        Artifact::Contributing => &mut presence.has_contributing,
        Artifact::Changelog => &mut presence.has_changelog,
        Artifact::SecurityPolicy => &mut presence.has_security_policy,
        Artifact::LinterConfig => &mut presence.has_linter_config,
        Artifact::TypeCheckingConfig => &mut presence.has_type_checking_config,
        Artifact::Ci => &mut presence.has_ci,
        Artifact::Tests => &mut presence.has_tests,
        Artifact::CodeOwners => &mut presence.has_code_owners,
        Artifact::Dependabot => &mut presence.has_dependabot,
        Artifact::CodeScanning => &mut presence.has_code_scanning,
        Artifact::EditorConfig => &mut presence.has_editor_config,
        Artifact::FormatterConfig => &mut presence.has_formatter_config,
        Artifact::GitIgnore => &mut presence.has_git_ignore,
    }
}

fn mark(presence: &mut FeaturePresence, artifact: Artifact) {
    *flag_mut(presence, artifact) = true;
}
