//! Shutdown coordination for the proxy.
//!
//! A single flag, flipped once. Waiters that start after the flip still see
//! it, so a server started late cannot miss the request to stop.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::lifecycle::signals::shutdown_signal;

/// Cloneable handle on the process-wide stop flag.
#[derive(Clone)]
pub struct Shutdown {
    flag: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self { flag: Arc::new(flag) }
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        self.flag.send_replace(true);
    }

    /// Future that completes once shutdown has been requested.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut stop = self.flag.subscribe();
        async move {
            let _ = stop.wait_for(|stopped| *stopped).await;
        }
    }

    /// Trigger shutdown on SIGINT or SIGTERM.
    pub fn trigger_on_signal(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_waiters() {
        let shutdown = Shutdown::new();
        let waiter = tokio::spawn(shutdown.wait());
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        shutdown.clone().trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_late_waiter_sees_earlier_trigger() {
        let shutdown = Shutdown::default();
        shutdown.trigger();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), shutdown.wait()).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_pends_until_triggered() {
        let shutdown = Shutdown::new();
        let result = tokio::time::timeout(Duration::from_secs(10), shutdown.wait()).await;
        assert!(result.is_err());
    }
}
