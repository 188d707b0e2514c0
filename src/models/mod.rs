pub mod github;
pub mod lenient;
pub mod metrics;
pub mod report;
pub mod score;
pub mod snapshot;

pub use metrics::*;
pub use report::*;
pub use score::*;
pub use snapshot::*;
