//! # Shutdown Signal
//!
//! Cooperative cancellation shared by the dispatcher and its couriers. Triggering
//! is permanent: every current and future call to [`ShutdownSignal::cancelled`]
//! resolves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::info;

#[derive(Debug, Default)]
struct ShutdownState {
    triggered: AtomicBool,
    notify: Notify,
}

/// Cloneable handle to a process-wide stop request
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    state: Arc<ShutdownState>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Returns `true` for the first trigger only.
    pub fn trigger(&self) -> bool {
        let first = !self.state.triggered.swap(true, Ordering::AcqRel);
        if first {
            info!("Shutdown requested");
            self.state.notify.notify_waiters();
        }
        first
    }

    pub fn is_triggered(&self) -> bool {
        self.state.triggered.load(Ordering::Acquire)
    }

    /// Resolves once shutdown has been requested
    pub async fn cancelled(&self) {
        loop {
            let notified = self.state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_trigger_wakes_waiters() {
        let signal = ShutdownSignal::new();
        let mut waiter = task::spawn(signal.cancelled());
        assert_pending!(waiter.poll());

        assert!(signal.clone().trigger());
        assert!(waiter.is_woken());
        assert_ready!(waiter.poll());
    }

    #[test]
    fn test_trigger_is_permanent() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
        assert!(signal.trigger());
        assert!(!signal.trigger());
        assert!(signal.is_triggered());

        let mut late = task::spawn(signal.cancelled());
        assert_ready!(late.poll());
    }

    #[tokio::test]
    async fn test_cancelled_across_tasks() {
        let signal = ShutdownSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };
        tokio::task::yield_now().await;
        signal.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
