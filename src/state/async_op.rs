//! Generic async operation state machine.
//!
//! `idle → pending → success | error`, driven only by [`AsyncOperation::execute`]
//! and [`AsyncOperation::reset`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;

use super::lock;

/// Lifecycle status of an [`AsyncOperation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AsyncStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// How overlapping settlements of one primitive are applied.
///
/// Nothing is cancelled under either policy; the policy only decides whose
/// result may write state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Every settlement is applied in the order calls settle, so the call that
    /// settles last wins, even across a `reset()`.
    #[default]
    LastSettled,
    /// Only the most recently issued call may write state; `reset()` also
    /// invalidates calls still in flight.
    LatestIssued,
}

impl fmt::Display for SettlePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlePolicy::LastSettled => f.write_str("last-settled"),
            SettlePolicy::LatestIssued => f.write_str("latest-issued"),
        }
    }
}

impl FromStr for SettlePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-settled" | "last_settled" => Ok(SettlePolicy::LastSettled),
            "latest-issued" | "latest_issued" => Ok(SettlePolicy::LatestIssued),
            other => Err(format!(
                "unknown settle policy '{}', expected 'last-settled' or 'latest-issued'",
                other
            )),
        }
    }
}

/// Generation counter used to recognize stale settlements.
#[derive(Debug, Default)]
pub(crate) struct Fence {
    generation: AtomicU64,
}

impl Fence {
    /// Start a new invocation and return its token.
    pub(crate) fn issue(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Invalidate every token issued so far.
    pub(crate) fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether a settlement carrying `token` may write state.
    pub(crate) fn admits(&self, policy: SettlePolicy, token: u64) -> bool {
        match policy {
            SettlePolicy::LastSettled => true,
            SettlePolicy::LatestIssued => self.generation.load(Ordering::SeqCst) == token,
        }
    }
}

/// Point-in-time view of an [`AsyncOperation`].
///
/// `value` and `error` are never both set, and both are `None` while the
/// status is `Idle` or `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncSnapshot<T, E> {
    pub status: AsyncStatus,
    pub value: Option<T>,
    pub error: Option<E>,
}

impl<T, E> AsyncSnapshot<T, E> {
    fn idle() -> Self {
        Self {
            status: AsyncStatus::Idle,
            value: None,
            error: None,
        }
    }
}

type Operation<A, T, E> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

struct Inner<A, T, E> {
    operation: Operation<A, T, E>,
    state: Mutex<AsyncSnapshot<T, E>>,
    fence: Fence,
    policy: SettlePolicy,
}

/// State machine around an async unit of work.
///
/// Cloning yields another handle to the same state.
///
/// # Example
///
/// ```ignore
/// use panel_state::state::{AsyncOperation, AsyncStatus};
///
/// let load = AsyncOperation::new(|id: u64| async move { fetch_report(id).await });
///
/// match load.execute(42).await {
///     Ok(report) => render(report),
///     Err(err) => show(err),
/// }
/// assert_ne!(load.status(), AsyncStatus::Pending);
/// ```
pub struct AsyncOperation<A, T, E> {
    inner: Arc<Inner<A, T, E>>,
}

impl<A, T, E> Clone for AsyncOperation<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, T, E> AsyncOperation<A, T, E>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Wrap `operation` with the default [`SettlePolicy`].
    pub fn new<F, Fut>(operation: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::with_policy(operation, SettlePolicy::default())
    }

    /// Wrap `operation` with an explicit settlement policy.
    pub fn with_policy<F, Fut>(operation: F, policy: SettlePolicy) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                operation: Arc::new(move |args| operation(args).boxed()),
                state: Mutex::new(AsyncSnapshot::idle()),
                fence: Fence::default(),
                policy,
            }),
        }
    }

    /// Run the operation.
    ///
    /// The outcome is both returned and recorded. Entering `Pending` clears the
    /// previous value and error.
    pub async fn execute(&self, args: A) -> Result<T, E> {
        let token = {
            let mut state = lock(&self.inner.state);
            state.status = AsyncStatus::Pending;
            state.value = None;
            state.error = None;
            self.inner.fence.issue()
        };

        let result = (self.inner.operation)(args).await;

        let mut state = lock(&self.inner.state);
        if !self.inner.fence.admits(self.inner.policy, token) {
            tracing::debug!(token, "Discarding stale async settlement");
            return result;
        }
        match &result {
            Ok(value) => {
                state.status = AsyncStatus::Success;
                state.value = Some(value.clone());
                state.error = None;
            }
            Err(error) => {
                state.status = AsyncStatus::Error;
                state.value = None;
                state.error = Some(error.clone());
            }
        }
        drop(state);
        result
    }

    /// Return to `Idle` with no value and no error.
    pub fn reset(&self) {
        *lock(&self.inner.state) = AsyncSnapshot::idle();
        self.inner.fence.bump();
    }

    pub fn policy(&self) -> SettlePolicy {
        self.inner.policy
    }

    pub fn status(&self) -> AsyncStatus {
        lock(&self.inner.state).status
    }

    pub fn value(&self) -> Option<T> {
        lock(&self.inner.state).value.clone()
    }

    pub fn error(&self) -> Option<E> {
        lock(&self.inner.state).error.clone()
    }

    pub fn snapshot(&self) -> AsyncSnapshot<T, E> {
        let state = lock(&self.inner.state);
        AsyncSnapshot {
            status: state.status,
            value: state.value.clone(),
            error: state.error.clone(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status() == AsyncStatus::Idle
    }

    pub fn is_pending(&self) -> bool {
        self.status() == AsyncStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status() == AsyncStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status() == AsyncStatus::Error
    }
}

impl<A, T: fmt::Debug, E: fmt::Debug> fmt::Debug for AsyncOperation<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOperation")
            .field("state", &*lock(&self.inner.state))
            .field("policy", &self.inner.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::poll;
    use tokio::sync::oneshot;

    type Gate = oneshot::Receiver<Result<u32, String>>;

    /// An operation that settles with whatever is sent through the gate.
    fn gated(policy: SettlePolicy) -> AsyncOperation<Gate, u32, String> {
        AsyncOperation::with_policy(
            |gate: Gate| async move { gate.await.unwrap_or_else(|_| Err("dropped".to_string())) },
            policy,
        )
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let op = gated(SettlePolicy::LastSettled);
        assert!(op.is_idle());
        assert_eq!(op.value(), None);
        assert_eq!(op.error(), None);
    }

    #[tokio::test]
    async fn test_success_records_value() {
        let op = AsyncOperation::new(|n: u32| async move { Ok::<_, String>(n * 2) });

        assert_eq!(op.execute(21).await, Ok(42));
        assert!(op.is_success());
        assert_eq!(op.value(), Some(42));
        assert_eq!(op.error(), None);
    }

    #[tokio::test]
    async fn test_failure_is_returned_not_raised() {
        let op = AsyncOperation::new(|_: ()| async { Err::<u32, _>("boom".to_string()) });

        assert_eq!(op.execute(()).await, Err("boom".to_string()));
        assert!(op.is_error());
        assert_eq!(op.value(), None);
        assert_eq!(op.error(), Some("boom".to_string()));
    }

    #[tokio::test]
    async fn test_pending_clears_previous_outcome() {
        let op = gated(SettlePolicy::LastSettled);
        let (tx, rx) = oneshot::channel();
        tx.send(Ok(1)).unwrap();
        op.execute(rx).await.unwrap();

        let (tx, rx) = oneshot::channel();
        let mut call = Box::pin(op.execute(rx));
        assert!(poll!(&mut call).is_pending());
        assert_eq!(
            op.snapshot(),
            AsyncSnapshot {
                status: AsyncStatus::Pending,
                value: None,
                error: None
            }
        );

        tx.send(Err("late".to_string())).unwrap();
        assert!(call.await.is_err());
        assert_eq!(op.error(), Some("late".to_string()));
    }

    #[tokio::test]
    async fn test_last_settled_wins() {
        let op = gated(SettlePolicy::LastSettled);
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();

        let mut first = Box::pin(op.execute(rx1));
        let mut second = Box::pin(op.execute(rx2));
        assert!(poll!(&mut first).is_pending());
        assert!(poll!(&mut second).is_pending());

        tx2.send(Ok(2)).unwrap();
        assert_eq!(second.await, Ok(2));
        assert_eq!(op.value(), Some(2));

        // the older call settles later and overwrites the fresher result
        tx1.send(Ok(1)).unwrap();
        assert_eq!(first.await, Ok(1));
        assert_eq!(op.value(), Some(1));
    }

    #[tokio::test]
    async fn test_latest_issued_discards_stale_result() {
        let op = gated(SettlePolicy::LatestIssued);
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();

        let mut first = Box::pin(op.execute(rx1));
        let mut second = Box::pin(op.execute(rx2));
        assert!(poll!(&mut first).is_pending());
        assert!(poll!(&mut second).is_pending());

        tx2.send(Ok(2)).unwrap();
        assert_eq!(second.await, Ok(2));

        tx1.send(Ok(1)).unwrap();
        // the stale caller still gets its own result
        assert_eq!(first.await, Ok(1));
        assert_eq!(op.value(), Some(2));
    }

    #[tokio::test]
    async fn test_reset_mid_flight_is_overwritten_under_last_settled() {
        let op = gated(SettlePolicy::LastSettled);
        let (tx, rx) = oneshot::channel();
        let mut call = Box::pin(op.execute(rx));
        assert!(poll!(&mut call).is_pending());

        op.reset();
        assert!(op.is_idle());

        tx.send(Ok(7)).unwrap();
        call.await.unwrap();
        assert!(op.is_success());
        assert_eq!(op.value(), Some(7));
    }

    #[tokio::test]
    async fn test_reset_mid_flight_sticks_under_latest_issued() {
        let op = gated(SettlePolicy::LatestIssued);
        let (tx, rx) = oneshot::channel();
        let mut call = Box::pin(op.execute(rx));
        assert!(poll!(&mut call).is_pending());

        op.reset();
        tx.send(Ok(7)).unwrap();
        call.await.unwrap();
        assert!(op.is_idle());
        assert_eq!(op.value(), None);
    }

    #[tokio::test]
    async fn test_reset_after_error() {
        let op = AsyncOperation::new(|_: ()| async { Err::<u32, _>("boom".to_string()) });
        let _ = op.execute(()).await;

        op.reset();
        assert_eq!(
            op.snapshot(),
            AsyncSnapshot {
                status: AsyncStatus::Idle,
                value: None,
                error: None
            }
        );
    }

    #[test]
    fn test_settle_policy_parse() {
        assert_eq!("latest-issued".parse::<SettlePolicy>(), Ok(SettlePolicy::LatestIssued));
        assert_eq!("LAST_SETTLED".parse::<SettlePolicy>(), Ok(SettlePolicy::LastSettled));
        assert!("newest".parse::<SettlePolicy>().is_err());
        assert_eq!(SettlePolicy::LatestIssued.to_string(), "latest-issued");
    }
}
