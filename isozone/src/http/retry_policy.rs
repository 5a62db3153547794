use serde::{Deserialize, Serialize};

use super::sleeper::{wait_duration, MAX_WAIT_SECONDS};
use super::{HttpError, Sleeper};

/// a failure kind the retry loop is allowed to retry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RetryCondition {
    Connection,
    Timeout,
    Status { code: u16 },
}

impl RetryCondition {
    pub fn matches(&self, error: &HttpError) -> bool {
        match (self, error) {
            (RetryCondition::Connection, HttpError::Connection(_)) => true,
            (RetryCondition::Timeout, HttpError::Timeout(_)) => true,
            (RetryCondition::Status { code }, HttpError::Status { status, .. }) => code == status,
            _ => false,
        }
    }
}

/// bounded exponential backoff. a call is attempted at most `max_retries + 1` times,
/// waiting `min_wait_seconds` before the first retry and multiplying the wait by
/// `wait_multiplier` after each one, up to `MAX_WAIT_SECONDS`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    #[serde(default = "RetryPolicy::default_min_wait_seconds")]
    pub min_wait_seconds: f64,
    #[serde(default = "RetryPolicy::default_wait_multiplier")]
    pub wait_multiplier: f64,
    #[serde(default = "RetryPolicy::default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "RetryPolicy::default_retry_on")]
    pub retry_on: Vec<RetryCondition>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_wait_seconds: Self::default_min_wait_seconds(),
            wait_multiplier: Self::default_wait_multiplier(),
            max_retries: Self::default_max_retries(),
            retry_on: Self::default_retry_on(),
        }
    }
}

impl RetryPolicy {
    fn default_min_wait_seconds() -> f64 {
        1.0
    }

    fn default_wait_multiplier() -> f64 {
        2.0
    }

    fn default_max_retries() -> u32 {
        3
    }

    fn default_retry_on() -> Vec<RetryCondition> {
        vec![RetryCondition::Connection, RetryCondition::Timeout]
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=MAX_WAIT_SECONDS).contains(&self.min_wait_seconds) {
            return Err(format!(
                "retry min_wait_seconds must be between 0 and {MAX_WAIT_SECONDS}, found {}",
                self.min_wait_seconds
            ));
        }
        if !self.wait_multiplier.is_finite() || self.wait_multiplier < 1.0 {
            return Err(format!(
                "retry wait_multiplier must be at least 1, found {}",
                self.wait_multiplier
            ));
        }
        Ok(())
    }

    pub fn is_retryable(&self, error: &HttpError) -> bool {
        self.retry_on.iter().any(|c| c.matches(error))
    }
}

/// runs `op` until it succeeds, fails with a non-retryable error, or the retry budget is
/// spent. the last error is returned unmodified. `op` receives the 0-based attempt number.
pub fn retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    label: &str,
    mut op: F,
) -> Result<T, HttpError>
where
    F: FnMut(u32) -> Result<T, HttpError>,
{
    let mut wait = policy.min_wait_seconds;
    let mut attempt: u32 = 0;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries && policy.is_retryable(&e) => {
                log::warn!(
                    "{label}: attempt {} of {} failed ({e}), retrying in {wait:.2}s",
                    attempt + 1,
                    policy.max_retries + 1
                );
                sleeper.sleep(wait_duration(wait));
                wait = (wait * policy.wait_multiplier).min(MAX_WAIT_SECONDS);
                attempt += 1;
            }
            Err(e) => {
                if attempt > 0 {
                    log::debug!("{label}: giving up after {} attempt(s)", attempt + 1);
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RecordingSleeper;
    use std::time::Duration;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            min_wait_seconds: 0.5,
            wait_multiplier: 3.0,
            max_retries: 3,
            retry_on: vec![RetryCondition::Connection, RetryCondition::Timeout],
        }
    }

    #[test]
    fn test_succeeds_after_k_failures() {
        let sleeper = RecordingSleeper::default();
        let result = retry(&policy(), &sleeper, "test", |attempt| {
            if attempt < 2 {
                Err(HttpError::Connection(format!("refused {attempt}")))
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result.ok(), Some(2));
        assert_eq!(
            sleeper.durations(),
            vec![Duration::from_secs_f64(0.5), Duration::from_secs_f64(1.5)]
        );
    }

    #[test]
    fn test_exhausted_budget_returns_last_error() {
        let sleeper = RecordingSleeper::default();
        let mut attempts = 0;
        let result: Result<(), HttpError> = retry(&policy(), &sleeper, "test", |attempt| {
            attempts += 1;
            Err(HttpError::Timeout(format!("attempt {attempt}")))
        });
        assert_eq!(attempts, 4);
        assert_eq!(sleeper.durations().len(), 3);
        match result {
            Err(HttpError::Timeout(msg)) => assert_eq!(msg, "attempt 3"),
            other => panic!("expected the last timeout, found {other:?}"),
        }
    }

    #[test]
    fn test_non_retryable_error_fails_immediately() {
        let sleeper = RecordingSleeper::default();
        let result: Result<(), HttpError> = retry(&policy(), &sleeper, "test", |_| {
            Err(HttpError::Status {
                status: 500,
                body: String::from("boom"),
            })
        });
        assert!(matches!(result, Err(HttpError::Status { status: 500, .. })));
        assert!(sleeper.durations().is_empty());
    }

    #[test]
    fn test_status_condition_is_retryable_when_configured() {
        let mut policy = policy();
        policy.retry_on.push(RetryCondition::Status { code: 429 });
        let sleeper = RecordingSleeper::default();
        let result = retry(&policy, &sleeper, "test", |attempt| {
            if attempt == 0 {
                Err(HttpError::Status {
                    status: 429,
                    body: String::new(),
                })
            } else {
                Ok(())
            }
        });
        assert!(result.is_ok());
        assert_eq!(sleeper.durations().len(), 1);
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            min_wait_seconds: 1000.0,
            wait_multiplier: 1e300,
            max_retries: 3,
            retry_on: vec![RetryCondition::Connection],
        };
        assert!(policy.validate().is_ok());
        let sleeper = RecordingSleeper::default();
        let result: Result<(), HttpError> = retry(&policy, &sleeper, "test", |_| {
            Err(HttpError::Connection(String::from("refused")))
        });
        assert!(result.is_err());
        let cap = Duration::from_secs_f64(MAX_WAIT_SECONDS);
        assert_eq!(
            sleeper.durations(),
            vec![Duration::from_secs_f64(1000.0), cap, cap]
        );
    }

    #[test]
    fn test_out_of_range_wait_rejected() {
        let mut policy = policy();
        policy.min_wait_seconds = 1e20;
        assert!(policy.validate().is_err());
        policy.min_wait_seconds = f64::NAN;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let policy: RetryPolicy =
            serde_json::from_str(r#"{"retry_on": [{"type": "status", "code": 503}]}"#)
                .expect("valid policy");
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.min_wait_seconds, 1.0);
        assert_eq!(policy.retry_on, vec![RetryCondition::Status { code: 503 }]);
    }
}
