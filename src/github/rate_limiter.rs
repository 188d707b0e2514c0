use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use reqwest::header::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

/// Requests per minute we allow ourselves regardless of the API quota.
const DEFAULT_MINUTE_BUDGET: u32 = 30;

/// Shared between every request a collector issues, including the
/// concurrent ones of a single snapshot.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
    minute_budget: u32,
}

struct RateLimitState {
    remaining: u32,
    reset_at: Option<Instant>,
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_MINUTE_BUDGET)
    }

    pub fn with_budget(minute_budget: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                remaining: 5000,
                reset_at: None,
                requests_this_minute: 0,
                minute_start: Instant::now(),
            })),
            minute_budget: minute_budget.max(1),
        }
    }

    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        // Quota exhausted: sleep until the advertised reset
        if state.remaining == 0 {
            if let Some(reset_at) = state.reset_at {
                let now = Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::info!("Rate limited, waiting {:?}", wait_duration);
                    sleep(wait_duration).await;
                    state = self.state.lock().await;
                }
            }
            state.remaining = 1;
        }

        let minute_elapsed = state.minute_start.elapsed();
        if minute_elapsed < Duration::from_secs(60) {
            if state.requests_this_minute >= self.minute_budget {
                let wait_time = Duration::from_secs(60) - minute_elapsed;
                drop(state);
                tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
                sleep(wait_time).await;
                state = self.state.lock().await;
                state.requests_this_minute = 0;
                state.minute_start = Instant::now();
            }
        } else {
            state.requests_this_minute = 0;
            state.minute_start = Instant::now();
        }

        state.requests_this_minute += 1;
    }

    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        let remaining = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());
        let reset = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if let Some(remaining) = remaining {
            self.record(remaining, reset).await;
        }
    }

    /// Applies a quota reading; `reset_epoch` is in Unix seconds.
    pub async fn record(&self, remaining: u32, reset_epoch: Option<u64>) {
        let mut state = self.state.lock().await;
        state.remaining = remaining;

        if let Some(wait_secs) = reset_epoch.map(seconds_until) {
            if wait_secs > 0 {
                state.reset_at = Some(Instant::now() + Duration::from_secs(wait_secs));
            }
        }

        if remaining < 10 {
            tracing::warn!("GitHub quota nearly exhausted: {} requests left", remaining);
        }
    }

    pub async fn remaining(&self) -> u32 {
        self.state.lock().await.remaining
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Seconds from now until a Unix timestamp, zero if it already passed.
pub fn seconds_until(reset_epoch: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    reset_epoch.saturating_sub(now)
}
