//! Declarative table of the quality and security artifacts we look for.
//!
//! Every rule is matched case-insensitively against an entry name. Fragment
//! matches are anchored (whole stem, prefix, suffix or whole token) so an
//! unrelated file sharing a substring never lights up a flag.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Artifact {
    Readme,
    License,
    Contributing,
    Changelog,
    SecurityPolicy,
    LinterConfig,
    TypeCheckingConfig,
    Ci,
    Tests,
    CodeOwners,
    Dependabot,
    CodeScanning,
    EditorConfig,
    FormatterConfig,
    GitIgnore,
}

/// Which listing a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Files,
    Workflows,
}

#[derive(Debug, Clone, Copy)]
pub enum MatchRule {
    /// Name equals a candidate.
    Exact(&'static [&'static str]),
    /// Name is a candidate, optionally followed by `.` and an extension.
    Stem(&'static [&'static str]),
    /// Name starts with a candidate.
    Prefix(&'static [&'static str]),
    /// Name ends with a candidate.
    Suffix(&'static [&'static str]),
    /// One of the alphanumeric words of the name equals a candidate.
    Token(&'static [&'static str]),
    /// Any entry at all.
    Any,
}

impl MatchRule {
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }

        match self {
            MatchRule::Exact(candidates) => candidates.iter().any(|c| name == *c),
            MatchRule::Stem(candidates) => candidates.iter().any(|c| {
                name == *c
                    || name
                        .strip_prefix(*c)
                        .map(|rest| rest.starts_with('.') && rest.len() > 1)
                        .unwrap_or(false)
            }),
            MatchRule::Prefix(candidates) => candidates.iter().any(|c| name.starts_with(*c)),
            MatchRule::Suffix(candidates) => candidates.iter().any(|c| name.ends_with(*c)),
            MatchRule::Token(candidates) => name
                .split(|ch: char| !ch.is_ascii_alphanumeric())
                .any(|token| candidates.iter().any(|c| *c == token)),
            MatchRule::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArtifactRule {
    pub artifact: Artifact,
    pub listing: Listing,
    pub rule: MatchRule,
}

const fn files(artifact: Artifact, rule: MatchRule) -> ArtifactRule {
    ArtifactRule {
        artifact,
        listing: Listing::Files,
        rule,
    }
}

const fn workflows(artifact: Artifact, rule: MatchRule) -> ArtifactRule {
    ArtifactRule {
        artifact,
        listing: Listing::Workflows,
        rule,
    }
}

/// Rules for the same artifact are alternatives.
pub const ARTIFACT_RULES: &[ArtifactRule] = &[
    files(Artifact::Readme, MatchRule::Stem(&["readme"])),
    files(Artifact::License, MatchRule::Stem(&["license", "licence", "copying"])),
    files(Artifact::License, MatchRule::Prefix(&["license-", "licence-"])),
    files(Artifact::Contributing, MatchRule::Stem(&["contributing"])),
    files(Artifact::Changelog, MatchRule::Stem(&["changelog", "changes", "history"])),
    files(Artifact::SecurityPolicy, MatchRule::Stem(&["security"])),
    files(
        Artifact::LinterConfig,
        MatchRule::Stem(&[
            ".eslintrc",
            "eslint.config",
            ".stylelintrc",
            "stylelint.config",
            ".pylintrc",
            ".flake8",
            "ruff",
            ".ruff",
            ".rubocop",
            ".golangci",
            "clippy",
            ".clippy",
            ".swiftlint",
            "biome",
            ".markdownlint",
        ]),
    ),
    files(
        Artifact::TypeCheckingConfig,
        MatchRule::Stem(&["tsconfig", "jsconfig", "mypy", "pyrightconfig", ".flowconfig"]),
    ),
    files(Artifact::TypeCheckingConfig, MatchRule::Exact(&["py.typed"])),
    workflows(Artifact::Ci, MatchRule::Any),
    files(
        Artifact::Ci,
        MatchRule::Exact(&[
            ".travis.yml",
            ".gitlab-ci.yml",
            ".circleci",
            "jenkinsfile",
            "azure-pipelines.yml",
            "bitbucket-pipelines.yml",
            "appveyor.yml",
            ".drone.yml",
        ]),
    ),
    files(
        Artifact::Tests,
        MatchRule::Exact(&["test", "tests", "__tests__", "spec", "specs", "testing", "e2e"]),
    ),
    files(
        Artifact::Tests,
        MatchRule::Stem(&[
            "pytest",
            "tox",
            "jest.config",
            "vitest.config",
            "karma.conf",
            "phpunit",
            ".mocharc",
            "cypress.config",
            "playwright.config",
        ]),
    ),
    files(
        Artifact::Tests,
        MatchRule::Suffix(&["_test.go", "_test.py", ".test.js", ".test.ts", ".spec.js", ".spec.ts"]),
    ),
    files(Artifact::Tests, MatchRule::Prefix(&["test_"])),
    workflows(Artifact::Tests, MatchRule::Token(&["test", "tests", "testing"])),
    files(Artifact::CodeOwners, MatchRule::Exact(&["codeowners"])),
    files(Artifact::Dependabot, MatchRule::Stem(&["dependabot"])),
    workflows(Artifact::Dependabot, MatchRule::Token(&["dependabot"])),
    workflows(Artifact::CodeScanning, MatchRule::Token(&["codeql", "semgrep", "scorecard"])),
    files(Artifact::EditorConfig, MatchRule::Exact(&[".editorconfig"])),
    files(
        Artifact::FormatterConfig,
        MatchRule::Stem(&[
            ".prettierrc",
            "prettier.config",
            ".clang-format",
            "rustfmt",
            ".rustfmt",
            ".black",
        ]),
    ),
    files(Artifact::GitIgnore, MatchRule::Exact(&[".gitignore"])),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_requires_extension_boundary() {
        let rule = MatchRule::Stem(&["readme"]);
        assert!(rule.matches("README"));
        assert!(rule.matches("Readme.md"));
        assert!(rule.matches("readme.rst"));
        assert!(!rule.matches("readme."));
        assert!(!rule.matches("readmes"));
        assert!(!rule.matches("unreadme.txt"));
        assert!(!rule.matches("readme_old.txt"));
    }

    #[test]
    fn test_token_matches_whole_words_only() {
        let rule = MatchRule::Token(&["test", "tests"]);
        assert!(rule.matches("Run Tests"));
        assert!(rule.matches("unit-test"));
        assert!(!rule.matches("Contest Deploy"));
        assert!(!rule.matches("latest"));
    }

    #[test]
    fn test_empty_names_never_match() {
        assert!(!MatchRule::Any.matches("   "));
        assert!(!MatchRule::Suffix(&[""]).matches(""));
    }
}
