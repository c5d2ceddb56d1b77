//! Timeout enforcement.
//!
//! # Responsibilities
//! - Fix a per-request deadline when the request arrives
//! - Bound the upstream send by that deadline
//! - Give the body relay a timer that fires at the same instant
//!
//! # Design Decisions
//! - Uses Tokio's timer facilities (`timeout_at`, `sleep_until`)
//! - One absolute instant per request, shared by every stage
//! - Expiry is reported as an error, never as a hang

use std::future::Future;
use std::time::Duration;

use tokio::time::{error::Elapsed, Instant, Sleep};

/// Absolute point in time by which one exchange must finish.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    timeout: Duration,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
            timeout,
        }
    }

    /// The duration this deadline was created with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Run `future`, giving up when the deadline passes.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Elapsed> {
        tokio::time::timeout_at(self.at, future).await
    }

    /// Timer that completes at the deadline.
    pub fn sleep(&self) -> Sleep {
        tokio::time::sleep_until(self.at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_before_deadline() {
        let deadline = Deadline::after(Duration::from_secs(1));
        let result = deadline.run(async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
        assert!(!deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let deadline = Deadline::after(Duration::from_millis(100));
        let result = deadline
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert!(result.is_err());
        assert!(deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_fires_at_deadline() {
        let deadline = Deadline::after(Duration::from_secs(5));
        assert_eq!(deadline.timeout(), Duration::from_secs(5));
        deadline.sleep().await;
        assert!(deadline.is_expired());
    }
}
