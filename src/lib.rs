pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod source;
pub mod taxonomy;
pub mod analysis;
pub mod storage;

pub use config::{Config, PipelineConfig, ScoreWeights, ScoringConfig};
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use source::{RepoRef, SnapshotSource};
pub use analysis::{AnalysisPipeline, TrustEngine};
pub use storage::Storage;
