use std::time::Duration;

/// upper bound on a single retry wait or rate limit pause.
pub const MAX_WAIT_SECONDS: f64 = 3600.0;

/// converts a configured wait to a duration, clamped to `[0, MAX_WAIT_SECONDS]`.
/// NaN becomes zero.
pub fn wait_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.clamp(0.0, MAX_WAIT_SECONDS)).unwrap_or_default()
}

/// blocks the calling thread. the retry loop and the rate limiter sleep through this
/// so that tests can observe waits without spending them.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// wall-clock sleeping via [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration)
    }
}

/// records requested sleeps instead of sleeping.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pub sleeps: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl RecordingSleeper {
    pub fn durations(&self) -> Vec<Duration> {
        self.sleeps.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }
}
