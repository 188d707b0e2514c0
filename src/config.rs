use crate::analysis::factors::FactorThresholds;
use crate::error::{Error, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub database_path: String,
    pub max_commits: u32,
    pub profile_limit: usize,
    pub concurrency_limit: usize,
    pub scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "repotrust.db".to_string());

        let max_commits = env::var("MAX_COMMITS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let profile_limit = env::var("CONTRIBUTOR_PROFILE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let concurrency_limit = env::var("CONCURRENCY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let weights = match env::var("SCORE_WEIGHTS") {
            Ok(raw) => ScoreWeights::parse(&raw)?,
            Err(_) => ScoreWeights::default(),
        };

        Ok(Self {
            github_token,
            database_path,
            max_commits,
            profile_limit,
            concurrency_limit,
            scoring: ScoringConfig {
                weights,
                ..ScoringConfig::default()
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_commits: u32,
    pub profile_limit: usize,
    pub concurrency_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_commits: 100,
            profile_limit: 5,
            concurrency_limit: 5,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_commits: config.max_commits,
            profile_limit: config.profile_limit,
            concurrency_limit: config.concurrency_limit,
        }
    }
}

/// Blend weights for the three sub-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub activity: f64,
    pub quality: f64,
    pub community: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            activity: 0.35,
            quality: 0.35,
            community: 0.30,
        }
    }
}

impl ScoreWeights {
    pub fn new(activity: f64, quality: f64, community: f64) -> Result<Self> {
        let weights = Self {
            activity,
            quality,
            community,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Parses an `activity,quality,community` triple.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Config(format!("SCORE_WEIGHTS must be numeric: {}", e)))?;

        match parts.as_slice() {
            [activity, quality, community] => Self::new(*activity, *quality, *community),
            _ => Err(Error::Config(format!(
                "SCORE_WEIGHTS expects three values, got {}",
                parts.len()
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let all = [self.activity, self.quality, self.community];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::Config(
                "score weights must be finite and non-negative".to_string(),
            ));
        }

        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(Error::Config(format!(
                "score weights must sum to 1.0, got {:.4}",
                sum
            )));
        }

        Ok(())
    }
}

/// Constants for the composite score. Handed to the engine at construction.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub bonus_points: u32,
    pub floor_minimum: u32,
    pub floor_margin: u32,
    pub thresholds: FactorThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            bonus_points: 5,
            floor_minimum: 20,
            floor_margin: 20,
            thresholds: FactorThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weights() {
        let weights = ScoreWeights::parse("0.5, 0.3, 0.2").unwrap();
        assert_eq!(weights.activity, 0.5);
        assert_eq!(weights.quality, 0.3);
        assert_eq!(weights.community, 0.2);
    }

    #[test]
    fn test_reject_bad_weights() {
        assert!(matches!(ScoreWeights::parse("0.5,0.5"), Err(Error::Config(_))));
        assert!(matches!(ScoreWeights::parse("a,b,c"), Err(Error::Config(_))));
        assert!(matches!(ScoreWeights::parse("0.6,0.6,0.2"), Err(Error::Config(_))));
        assert!(matches!(ScoreWeights::parse("1.2,-0.1,-0.1"), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(ScoreWeights::default().validate().is_ok());
    }
}
