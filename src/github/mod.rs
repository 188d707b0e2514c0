pub mod client;
pub mod paginator;
pub mod rate_limiter;
pub mod snapshot;

pub use client::GitHubClient;
pub use paginator::Paginator;
pub use rate_limiter::RateLimiter;
pub use snapshot::RepositoryData;
