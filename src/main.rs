use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use repotrust::models::{RepositoryReport, RepositorySnapshot};
use repotrust::storage::ScoreRecord;
use repotrust::{
    AnalysisPipeline, Config, GitHubClient, PipelineConfig, RepoRef, Storage, TrustEngine,
};

#[derive(Parser, Debug)]
#[command(name = "repotrust")]
#[command(version = "0.1.0")]
#[command(about = "Score how far a GitHub repository can be trusted as a dependency")]
struct Args {
    /// Repository to analyze (owner/name or GitHub URL)
    #[arg(
        short,
        long,
        required_unless_present = "snapshot",
        conflicts_with = "snapshot"
    )]
    repo: Option<String>,

    /// Score an offline snapshot JSON file instead of calling GitHub
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Database path for storing results (defaults to DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,

    /// Use the stored report if one exists
    #[arg(long)]
    cached: bool,

    /// Maximum commits to sample
    #[arg(long)]
    max_commits: Option<u32>,

    /// Number of top contributors whose accounts are looked up
    #[arg(long)]
    profiles: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("repotrust=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let database = args
        .database
        .clone()
        .unwrap_or_else(|| config.database_path.clone());
    let storage = Storage::new(&database)?;

    let mut pipeline_config = PipelineConfig::from(&config);
    if let Some(max_commits) = args.max_commits {
        pipeline_config.max_commits = max_commits;
    }
    if let Some(profiles) = args.profiles {
        pipeline_config.profile_limit = profiles;
    }

    let snapshot = match &args.snapshot {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Some(RepositorySnapshot::from_json(&raw)?)
        }
        None => None,
    };

    let repo = match (&snapshot, &args.repo) {
        (None, Some(raw)) => Some(RepoRef::parse(raw)?),
        _ => None,
    };

    let full_name = match (&snapshot, &repo) {
        (Some(snapshot), _) => snapshot.display_name().to_string(),
        (None, Some(repo)) => repo.full_name(),
        (None, None) => anyhow::bail!("either --repo or --snapshot is required"),
    };

    if args.cached {
        if let Some(report) = storage.get_report(&full_name)? {
            tracing::info!("Using cached report from {}", report.analyzed_at);
            let history = storage.score_history(&full_name)?;
            output_report(&report, &history, &args)?;
            return Ok(());
        }
        tracing::info!("No cached report found, performing fresh analysis");
    }

    let github = GitHubClient::new(config.github_token.as_deref())?;
    if config.github_token.is_none() && snapshot.is_none() {
        tracing::warn!("GITHUB_TOKEN not set, using the unauthenticated quota");
    }

    let engine = TrustEngine::new(config.scoring.clone());
    let pipeline = AnalysisPipeline::new(github, engine, storage, pipeline_config);

    let report = match (snapshot, repo) {
        (Some(snapshot), _) => {
            tracing::info!("Scoring offline snapshot of {}", full_name);
            pipeline.analyze_snapshot(&snapshot)?
        }
        (None, Some(repo)) => {
            tracing::info!("Starting analysis for repository: {}", repo);
            match pipeline.analyze_repository(&repo).await {
                Ok(report) => report,
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        "Analysis of {} hit a transient failure, try again later",
                        repo
                    );
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        (None, None) => anyhow::bail!("either --repo or --snapshot is required"),
    };

    let history = pipeline.storage().score_history(&report.repository)?;
    output_report(&report, &history, &args)?;

    Ok(())
}

fn output_report(
    report: &RepositoryReport,
    history: &[ScoreRecord],
    args: &Args,
) -> anyhow::Result<()> {
    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Markdown => format_markdown(report, history),
        OutputFormat::Text => format_text(report, history),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn format_text(report: &RepositoryReport, history: &[ScoreRecord]) -> String {
    let assessment = &report.assessment;
    let result = &assessment.result;
    let mut output = String::new();

    output.push_str(&format!("\n=== Trust Report: {} ===\n\n", report.repository));
    output.push_str(&format!("Trust Score: {}/100\n", result.score));
    output.push_str(&format!("Risk Level: {}\n", result.risk_level));
    output.push_str(&format!("Maturity: {}\n", result.tier));
    output.push_str(&format!(
        "Sub-scores: activity {}, quality {}, community {}\n",
        result.breakdown.sub_scores.activity,
        result.breakdown.sub_scores.quality,
        result.breakdown.sub_scores.community
    ));
    output.push_str(&format!(
        "Composite {} / floor {}\n",
        result.breakdown.composite, result.breakdown.floor
    ));

    output.push_str(&format!(
        "\nAge: {} days, last activity {} days ago ({})\n",
        assessment.time_metrics.age_days,
        assessment.time_metrics.last_updated_days,
        if assessment.time_metrics.is_active {
            "active"
        } else {
            "inactive"
        }
    ));
    output.push_str(&format!(
        "Commits sampled: {} by {} authors\n",
        assessment.commit_analysis.frequency, assessment.commit_analysis.author_count
    ));
    output.push_str(&format!(
        "Contributors: {} (top share {:.1}%)\n",
        assessment.contributors.count, assessment.contributors.top_share
    ));

    if !result.trust_factors.is_empty() {
        output.push_str("\nTrust Factors:\n");
        for factor in &result.trust_factors {
            output.push_str(&format!("  + {}\n", factor));
        }
    }

    if !result.risk_factors.is_empty() {
        output.push_str("\nRisk Factors:\n");
        for factor in &result.risk_factors {
            output.push_str(&format!("  - {}\n", factor));
        }
    }

    if !report.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &report.warnings {
            output.push_str(&format!("  ! {}\n", warning));
        }
    }

    if !result.bonuses.is_empty() {
        output.push_str("\nBonuses:\n");
        for bonus in &result.bonuses {
            output.push_str(&format!("  * {}\n", bonus));
        }
    }

    let features = &assessment.features;
    output.push_str("\nProject Hygiene:\n");
    output.push_str(&format!("  README: {}\n", yes_no(features.has_readme)));
    output.push_str(&format!("  License: {}\n", yes_no(features.has_license)));
    output.push_str(&format!(
        "  Contributing guide: {}\n",
        yes_no(features.has_contributing)
    ));
    output.push_str(&format!("  CI: {}\n", yes_no(features.has_ci)));
    output.push_str(&format!("  Tests: {}\n", yes_no(features.has_tests)));
    output.push_str(&format!(
        "  Security features: {}/3\n",
        features.security_feature_count()
    ));

    if !report.languages.is_empty() {
        let languages: Vec<String> = report
            .languages
            .iter()
            .take(5)
            .map(|l| format!("{} {:.1}%", l.language, l.percentage))
            .collect();
        output.push_str(&format!("\nLanguages: {}\n", languages.join(", ")));
    }

    output.push_str(&format!(
        "Issue resolution: {:.0}%, PR merge rate: {:.0}%\n",
        report.engagement.issue_resolution_rate * 100.0,
        report.engagement.pull_request_merge_rate * 100.0
    ));

    if history.len() > 1 {
        let scores: Vec<String> = history.iter().map(|h| h.score.to_string()).collect();
        output.push_str(&format!("\nScore history: {}\n", scores.join(" -> ")));
    }

    output.push_str(&format!(
        "\nAnalyzed on: {}\n",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn format_markdown(report: &RepositoryReport, history: &[ScoreRecord]) -> String {
    let assessment = &report.assessment;
    let result = &assessment.result;
    let mut output = String::new();

    output.push_str(&format!("# Trust Report: {}\n\n", report.repository));

    output.push_str("## Summary\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Trust Score | {}/100 |\n", result.score));
    output.push_str(&format!("| Risk Level | {} |\n", result.risk_level));
    output.push_str(&format!("| Maturity | {} |\n", result.tier));
    output.push_str(&format!(
        "| Activity | {} |\n",
        result.breakdown.sub_scores.activity
    ));
    output.push_str(&format!(
        "| Quality | {} |\n",
        result.breakdown.sub_scores.quality
    ));
    output.push_str(&format!(
        "| Community | {} |\n",
        result.breakdown.sub_scores.community
    ));
    output.push_str(&format!(
        "| Age (days) | {} |\n",
        assessment.time_metrics.age_days
    ));
    output.push_str(&format!(
        "| Contributors | {} |\n",
        assessment.contributors.count
    ));

    if !result.trust_factors.is_empty() {
        output.push_str("\n## Trust Factors\n\n");
        for factor in &result.trust_factors {
            output.push_str(&format!("- {}\n", factor));
        }
    }

    if !result.risk_factors.is_empty() {
        output.push_str("\n## Risk Factors\n\n");
        for factor in &result.risk_factors {
            output.push_str(&format!("- **{}**\n", factor));
        }
    }

    if !report.warnings.is_empty() {
        output.push_str("\n## Warnings\n\n");
        for warning in &report.warnings {
            output.push_str(&format!("- {}\n", warning));
        }
    }

    if !report.languages.is_empty() {
        output.push_str("\n## Languages\n\n");
        output.push_str("| Language | Share |\n|----------|-------|\n");
        for language in report.languages.iter().take(10) {
            output.push_str(&format!(
                "| {} | {:.1}% |\n",
                language.language, language.percentage
            ));
        }
    }

    if history.len() > 1 {
        output.push_str("\n## Score History\n\n");
        output.push_str("| Analyzed | Score | Risk |\n|----------|-------|------|\n");
        for record in history {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                record.analyzed_at.format("%Y-%m-%d"),
                record.score,
                record.risk_level
            ));
        }
    }

    output.push_str(&format!(
        "\n---\n*Analyzed on {}*\n",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
