use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid repository identifier: {0}")]
    InvalidRepository(String),

    #[error("GitHub returned {status} for {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited(_) | Error::Network(_) => true,
            Error::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(Error::RateLimited(30).is_retryable());
        assert!(Error::HttpStatus {
            status: 502,
            url: "/repos/a/b".to_string(),
            body: String::new(),
        }
        .is_retryable());
        assert!(!Error::HttpStatus {
            status: 404,
            url: "/repos/a/b".to_string(),
            body: String::new(),
        }
        .is_retryable());
        assert!(!Error::InvalidSnapshot("x".to_string()).is_retryable());
    }
}
