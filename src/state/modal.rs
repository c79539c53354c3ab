//! Modal open/close lifecycle with a transient payload.
//!
//! The payload outlives `close()` by a short grace period so an exit animation
//! can still render it.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{lock, ShallowMerge, ToggleState};
use crate::config::StateConfig;
use crate::timer::Timer;

#[derive(Debug)]
struct ModalState<T> {
    open: ToggleState,
    data: Option<T>,
}

/// Open/close state plus the data the modal was opened with.
///
/// `close()` hides the modal at once and clears the data after the grace
/// period. `toggle()` only flips visibility and never schedules a clear.
pub struct ModalController<T> {
    state: Arc<Mutex<ModalState<T>>>,
    grace: Duration,
    clear: Timer,
}

impl<T> ModalController<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::with_grace(Duration::from_millis(crate::config::DEFAULT_MODAL_GRACE_MS))
    }

    pub fn with_grace(grace: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ModalState {
                open: ToggleState::new(false),
                data: None,
            })),
            grace,
            clear: Timer::new(),
        }
    }

    /// Use the configured grace period.
    pub fn from_config(config: &StateConfig) -> Self {
        Self::with_grace(config.modal_grace)
    }

    /// Show the modal with `data`, cancelling a pending clear.
    pub fn open(&mut self, data: Option<T>) {
        self.clear.cancel();
        let mut state = lock(&self.state);
        state.data = data;
        state.open.set_true();
    }

    /// Hide the modal now and drop its data once the grace period has passed.
    ///
    /// The data is only dropped if the modal is still closed by then. Without
    /// a tokio runtime to wait on, the data is dropped at once.
    pub fn close(&mut self) {
        lock(&self.state).open.set_false();

        let state = Arc::clone(&self.state);
        let grace_ms = self.grace.as_millis() as u64;
        let scheduled = self.clear.schedule(self.grace, move || {
            let mut state = lock(&state);
            if !state.open.value() {
                state.data = None;
                tracing::debug!(grace_ms, "Modal data cleared");
            }
        });
        if !scheduled {
            lock(&self.state).data = None;
        }
    }

    /// Flip visibility without touching the data.
    ///
    /// Opening this way cancels a pending clear; closing this way does not
    /// schedule one.
    pub fn toggle(&mut self) -> bool {
        let now_open = lock(&self.state).open.toggle();
        if now_open {
            self.clear.cancel();
        }
        now_open
    }

    /// Shallow-merge `patch` into the data; missing data becomes `patch`.
    pub fn update_data(&self, patch: T)
    where
        T: ShallowMerge,
    {
        let mut state = lock(&self.state);
        match state.data.as_mut() {
            Some(data) => data.merge(patch),
            None => state.data = Some(patch),
        }
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).open.value()
    }

    pub fn data(&self) -> Option<T> {
        lock(&self.state).data.clone()
    }

    /// Whether a post-close clear is still scheduled.
    pub fn is_clear_pending(&self) -> bool {
        self.clear.is_pending()
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }
}

impl<T> Default for ModalController<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ModalController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalController")
            .field("state", &*lock(&self.state))
            .field("grace", &self.grace)
            .finish()
    }
}
