//! Debounced values and callbacks.
//!
//! Both primitives wait for a quiet period: every new input restarts the
//! timer, and only the last input of a burst takes effect. Dropping either one
//! cancels whatever is still pending.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::StateConfig;
use crate::timer::Timer;

/// A value whose published copy trails its input by a quiet period.
///
/// # Example
///
/// ```ignore
/// use panel_state::state::DebouncedValue;
///
/// let mut keyword = DebouncedValue::new(String::new(), Duration::from_millis(500));
/// keyword.set("acm".to_string());
/// keyword.set("acme".to_string());
/// // 500ms later: keyword.get() == "acme"
/// ```
pub struct DebouncedValue<T> {
    input: T,
    published: Arc<watch::Sender<T>>,
    delay: Duration,
    timer: Timer,
}

impl<T> DebouncedValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (published, _) = watch::channel(initial.clone());
        Self {
            input: initial,
            published: Arc::new(published),
            delay,
            timer: Timer::new(),
        }
    }

    /// Use the configured debounce delay.
    pub fn from_config(initial: T, config: &StateConfig) -> Self {
        Self::new(initial, config.debounce_delay)
    }

    /// Record a new input and restart the quiet period.
    ///
    /// Setting the current input again is not a change and leaves any pending
    /// publish alone.
    pub fn set(&mut self, value: T) {
        if value == self.input {
            return;
        }
        self.input = value.clone();
        let published = Arc::clone(&self.published);
        self.timer.schedule(self.delay, move || {
            published.send_replace(value);
        });
    }

    /// The published (debounced) value.
    pub fn get(&self) -> T {
        self.published.borrow().clone()
    }

    /// The latest input, published or not.
    pub fn input(&self) -> &T {
        &self.input
    }

    /// Receiver notified each time a value is published.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.published.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Drop a pending publish. The input falls back to the published value.
    pub fn cancel(&mut self) -> bool {
        self.input = self.published.borrow().clone();
        self.timer.cancel()
    }
}

impl<T: fmt::Debug> fmt::Debug for DebouncedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedValue")
            .field("input", &self.input)
            .field("published", &*self.published.borrow())
            .field("delay", &self.delay)
            .finish()
    }
}

/// A callback that only runs once calls stop arriving for a quiet period.
///
/// Each call cancels the previous schedule; the last call of a burst runs
/// exactly once, with its own arguments.
pub struct DebouncedCallback<A> {
    callback: Arc<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    timer: Timer,
}

impl<A: Send + 'static> DebouncedCallback<A> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            delay,
            timer: Timer::new(),
        }
    }

    /// Use the configured debounce delay.
    pub fn from_config<F>(config: &StateConfig, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::new(config.debounce_delay, callback)
    }

    /// Schedule the callback with `args`, replacing any pending call.
    pub fn call(&mut self, args: A) {
        let callback = Arc::clone(&self.callback);
        self.timer.schedule(self.delay, move || callback(args));
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Drop the pending call, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.timer.cancel()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<A> fmt::Debug for DebouncedCallback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedCallback")
            .field("delay", &self.delay)
            .field("pending", &self.timer.is_pending())
            .finish()
    }
}
