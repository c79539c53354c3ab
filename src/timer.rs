//! Cancellable one-shot timer.
//!
//! A [`Timer`] owns at most one scheduled task. Scheduling again replaces the
//! previous task, and dropping the timer aborts whatever is still pending, so
//! a controller that owns a timer can never write state after its teardown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// One-shot timer backed by a tokio task.
#[derive(Debug, Default)]
pub struct Timer {
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` once after `delay`, cancelling any previously scheduled run.
    ///
    /// The deadline is fixed at the moment of the call, not when the task is
    /// first polled. Returns `false` (and drops `f`) if no tokio runtime is
    /// available.
    pub fn schedule<F>(&mut self, delay: Duration, f: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        // Only spawn if a tokio runtime is available
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(delay_ms = delay.as_millis() as u64, "No tokio runtime; timer not scheduled");
            return false;
        };

        let deadline = Instant::now() + delay;
        self.handle = Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            f();
        }));
        true
    }

    /// Cancel the pending run, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Whether a scheduled run has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
