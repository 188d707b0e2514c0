pub mod branches;
pub mod commit_patterns;
pub mod contributors;
pub mod engagement;
pub mod factors;
pub mod maturity;
pub mod pipeline;
pub mod report;
pub mod scoring_engine;
pub mod structure;
pub mod time_metrics;
pub mod warnings;

pub use factors::FactorExtractor;
pub use pipeline::AnalysisPipeline;
pub use report::build_report;
pub use scoring_engine::TrustEngine;
