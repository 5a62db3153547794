use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::sleeper::{wait_duration, MAX_WAIT_SECONDS};
use super::Sleeper;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RateLimitConfig {
    /// number of requests between pauses. 0 disables the limiter.
    #[serde(default = "RateLimitConfig::default_requests_per_pause")]
    pub requests_per_pause: usize,
    #[serde(default = "RateLimitConfig::default_pause_seconds")]
    pub pause_seconds: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_pause: Self::default_requests_per_pause(),
            pause_seconds: Self::default_pause_seconds(),
        }
    }
}

impl RateLimitConfig {
    fn default_requests_per_pause() -> usize {
        5
    }

    fn default_pause_seconds() -> f64 {
        1.0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=MAX_WAIT_SECONDS).contains(&self.pause_seconds) {
            return Err(format!(
                "rate limit pause_seconds must be between 0 and {MAX_WAIT_SECONDS}, found {}",
                self.pause_seconds
            ));
        }
        Ok(())
    }
}

/// sleeps once every `requests_per_pause` completed requests. the counter is 1-indexed
/// and resets to 0 after each pause, so N requests produce N / requests_per_pause pauses.
pub struct RateLimiter {
    config: RateLimitConfig,
    sleeper: Arc<dyn Sleeper>,
    count: usize,
    pauses: usize,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, sleeper: Arc<dyn Sleeper>) -> RateLimiter {
        RateLimiter {
            config,
            sleeper,
            count: 0,
            pauses: 0,
        }
    }

    /// runs one request, then counts it.
    pub fn run<T>(&mut self, request: impl FnOnce() -> T) -> T {
        let result = request();
        self.record_request();
        result
    }

    pub fn record_request(&mut self) {
        if self.config.requests_per_pause == 0 {
            return;
        }
        self.count += 1;
        if self.count >= self.config.requests_per_pause {
            log::debug!(
                "rate limit reached after {} requests, pausing for {}s",
                self.count,
                self.config.pause_seconds
            );
            self.sleeper.sleep(wait_duration(self.config.pause_seconds));
            self.count = 0;
            self.pauses += 1;
        }
    }

    pub fn pauses(&self) -> usize {
        self.pauses
    }
}
