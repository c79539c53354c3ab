//! Backend-facing resources and mutations.
//!
//! [`ApiResource`] is the read side: it keeps the last successfully fetched
//! data, can fetch on creation, and unwraps a `data` envelope. [`ApiMutation`]
//! is the write side: it never runs on its own and keeps no data. Both turn
//! failures into a human-readable message, preferring the server's `detail`.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::async_op::{Fence, SettlePolicy};
use super::lock;
use crate::config::{StateConfig, DEFAULT_OPERATION_FAILED_MESSAGE, DEFAULT_REQUEST_FAILED_MESSAGE};
use crate::error::ApiError;
use crate::traits::{ApiBackend, ApiRequest, Method};

/// What a fetcher resolves to: either `{ "data": T, .. }` or a bare `T`.
///
/// Only a JSON object that actually carries a `data` key is treated as an
/// envelope. If that `data` does not fit `T`, the whole value is tried as a
/// bare `T` before giving up.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    /// The value a resource stores.
    pub fn into_inner(self) -> T {
        match self {
            Payload::Enveloped { data } => data,
            Payload::Bare(value) => value,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Payload<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Some(data) = value.get("data") else {
            return serde_json::from_value(value).map(Payload::Bare).map_err(D::Error::custom);
        };
        match serde_json::from_value(data.clone()) {
            Ok(data) => Ok(Payload::Enveloped { data }),
            Err(err) => serde_json::from_value(value)
                .map(Payload::Bare)
                .map_err(|_| D::Error::custom(err)),
        }
    }
}

impl<T: DeserializeOwned> Payload<T> {
    /// Interpret a JSON response body.
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        serde_json::from_value(body)
            .map_err(|err| ApiError::new(format!("Unexpected response body: {}", err)))
    }
}

type SuccessCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&ApiError) + Send + Sync>;
type Fetcher<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<Payload<T>, ApiError>> + Send + Sync>;
type Sender<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// Options for an [`ApiResource`].
pub struct ApiOptions<T> {
    /// Fetch once as soon as the resource is created
    pub immediate: bool,
    /// Data exposed before the first successful fetch and after `reset()`
    pub initial_data: T,
    /// Fallback message when the error carries none
    pub default_error: String,
    /// How overlapping fetches are applied
    pub settle_policy: SettlePolicy,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

impl<T: Default> Default for ApiOptions<T> {
    fn default() -> Self {
        Self {
            immediate: false,
            initial_data: T::default(),
            default_error: DEFAULT_REQUEST_FAILED_MESSAGE.to_string(),
            settle_policy: SettlePolicy::default(),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T: Default> ApiOptions<T> {
    /// Defaults taken from `config`.
    pub fn from_config(config: &StateConfig) -> Self {
        Self {
            default_error: config.request_failed_message.clone(),
            settle_policy: config.settle_policy,
            ..Self::default()
        }
    }
}

impl<T> ApiOptions<T> {
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn initial_data(mut self, data: T) -> Self {
        self.initial_data = data;
        self
    }

    pub fn default_error(mut self, message: impl Into<String>) -> Self {
        self.default_error = message.into();
        self
    }

    pub fn settle_policy(mut self, policy: SettlePolicy) -> Self {
        self.settle_policy = policy;
        self
    }

    /// Called with the new data after a successful fetch has been recorded.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Called with the raw error after a failed fetch has been recorded.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ApiError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }
}

/// Point-in-time view of an [`ApiResource`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

struct ResourceInner<A, T> {
    fetcher: Fetcher<A, T>,
    state: Mutex<ResourceSnapshot<T>>,
    initial_data: T,
    default_error: String,
    policy: SettlePolicy,
    fence: Fence,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

/// A read-oriented backend resource.
///
/// `data` keeps the last successful result across failed fetches; `loading`
/// is true while a fetch is pending; `error` is a user-facing message.
/// Cloning yields another handle to the same resource.
///
/// # Example
///
/// ```ignore
/// use panel_state::state::{ApiOptions, ApiResource};
///
/// let customers = ApiResource::get(backend, "/customers", ApiOptions::<Vec<Customer>>::default());
/// customers.execute(filters.to_query_pairs()).await?;
/// for customer in customers.data() { /* .. */ }
/// ```
pub struct ApiResource<A, T> {
    inner: Arc<ResourceInner<A, T>>,
}

impl<A, T> Clone for ApiResource<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, T> ApiResource<A, T>
where
    A: Default + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Create a resource over `fetcher`.
    ///
    /// With `options.immediate`, one fetch with `A::default()` is spawned on
    /// the current tokio runtime.
    pub fn new<F, Fut>(fetcher: F, options: ApiOptions<T>) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Payload<T>, ApiError>> + Send + 'static,
    {
        let resource = Self {
            inner: Arc::new(ResourceInner {
                fetcher: Arc::new(move |args| fetcher(args).boxed()),
                state: Mutex::new(ResourceSnapshot {
                    data: options.initial_data.clone(),
                    loading: false,
                    error: None,
                }),
                initial_data: options.initial_data,
                default_error: options.default_error,
                policy: options.settle_policy,
                fence: Fence::default(),
                on_success: options.on_success,
                on_error: options.on_error,
            }),
        };

        if options.immediate {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let this = resource.clone();
                    runtime.spawn(async move {
                        let _ = this.execute(A::default()).await;
                    });
                }
                Err(_) => tracing::warn!("No tokio runtime; immediate fetch skipped"),
            }
        }

        resource
    }

    /// Fetch, record the outcome, and return the data or the error message.
    pub async fn execute(&self, args: A) -> Result<T, String> {
        let token = {
            let mut state = lock(&self.inner.state);
            state.loading = true;
            state.error = None;
            self.inner.fence.issue()
        };

        let result = (self.inner.fetcher)(args).await;
        let current = self.inner.fence.admits(self.inner.policy, token);

        match result {
            Ok(payload) => {
                let data = payload.into_inner();
                if current {
                    {
                        let mut state = lock(&self.inner.state);
                        state.data = data.clone();
                        state.loading = false;
                    }
                    if let Some(on_success) = &self.inner.on_success {
                        on_success(&data);
                    }
                } else {
                    tracing::debug!(token, "Discarding stale resource response");
                }
                Ok(data)
            }
            Err(err) => {
                let message = err.user_message(&self.inner.default_error);
                if current {
                    tracing::debug!(error = %err, "Resource fetch failed");
                    {
                        let mut state = lock(&self.inner.state);
                        state.error = Some(message.clone());
                        state.loading = false;
                    }
                    if let Some(on_error) = &self.inner.on_error {
                        on_error(&err);
                    }
                } else {
                    tracing::debug!(token, error = %err, "Discarding stale resource failure");
                }
                Err(message)
            }
        }
    }

    /// Replace the data locally (e.g. after an optimistic edit).
    pub fn set_data(&self, data: T) {
        lock(&self.inner.state).data = data;
    }

    /// Back to the initial data, not loading, no error.
    pub fn reset(&self) {
        *lock(&self.inner.state) = ResourceSnapshot {
            data: self.inner.initial_data.clone(),
            loading: false,
            error: None,
        };
        self.inner.fence.bump();
    }

    pub fn data(&self) -> T {
        lock(&self.inner.state).data.clone()
    }

    pub fn loading(&self) -> bool {
        lock(&self.inner.state).loading
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.inner.state).error.clone()
    }

    pub fn snapshot(&self) -> ResourceSnapshot<T> {
        lock(&self.inner.state).clone()
    }
}

impl<T> ApiResource<Vec<(String, String)>, T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// A resource that GETs `path`, taking its query pairs per call.
    pub fn get(backend: Arc<dyn ApiBackend>, path: impl Into<String>, options: ApiOptions<T>) -> Self {
        let path = path.into();
        Self::new(
            move |query: Vec<(String, String)>| {
                let backend = Arc::clone(&backend);
                let request = ApiRequest::get(path.clone()).with_query(query);
                async move { Payload::from_body(backend.send(request).await?) }
            },
            options,
        )
    }
}

impl<A, T: fmt::Debug> fmt::Debug for ApiResource<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResource")
            .field("state", &*lock(&self.inner.state))
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

/// Options for an [`ApiMutation`].
pub struct MutationOptions<T> {
    /// Fallback message when the error carries none
    pub default_error: String,
    /// How overlapping calls are applied
    pub settle_policy: SettlePolicy,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

impl<T> Default for MutationOptions<T> {
    fn default() -> Self {
        Self {
            default_error: DEFAULT_OPERATION_FAILED_MESSAGE.to_string(),
            settle_policy: SettlePolicy::default(),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> MutationOptions<T> {
    /// Defaults taken from `config`.
    pub fn from_config(config: &StateConfig) -> Self {
        Self {
            default_error: config.operation_failed_message.clone(),
            settle_policy: config.settle_policy,
            ..Self::default()
        }
    }

    pub fn default_error(mut self, message: impl Into<String>) -> Self {
        self.default_error = message.into();
        self
    }

    pub fn settle_policy(mut self, policy: SettlePolicy) -> Self {
        self.settle_policy = policy;
        self
    }

    /// Called with the result after a successful call has been recorded.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Called with the raw error after a failed call has been recorded.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ApiError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }
}

#[derive(Debug, Default)]
struct MutationState {
    loading: bool,
    error: Option<String>,
}

struct MutationInner<A, T> {
    sender: Sender<A, T>,
    state: Mutex<MutationState>,
    default_error: String,
    policy: SettlePolicy,
    fence: Fence,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

/// A write-oriented backend operation (create, update, delete).
///
/// Never runs on its own and keeps no result; only `loading` and `error`
/// are tracked. Cloning yields another handle to the same mutation.
pub struct ApiMutation<A, T> {
    inner: Arc<MutationInner<A, T>>,
}

impl<A, T> Clone for ApiMutation<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, T> ApiMutation<A, T>
where
    A: Send + 'static,
    T: Send + 'static,
{
    pub fn new<F, Fut>(sender: F, options: MutationOptions<T>) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(MutationInner {
                sender: Arc::new(move |args| sender(args).boxed()),
                state: Mutex::new(MutationState::default()),
                default_error: options.default_error,
                policy: options.settle_policy,
                fence: Fence::default(),
                on_success: options.on_success,
                on_error: options.on_error,
            }),
        }
    }

    /// Run the mutation and return its result or the error message.
    pub async fn mutate(&self, args: A) -> Result<T, String> {
        let token = {
            let mut state = lock(&self.inner.state);
            state.loading = true;
            state.error = None;
            self.inner.fence.issue()
        };

        let result = (self.inner.sender)(args).await;
        let current = self.inner.fence.admits(self.inner.policy, token);

        match result {
            Ok(value) => {
                if current {
                    lock(&self.inner.state).loading = false;
                    if let Some(on_success) = &self.inner.on_success {
                        on_success(&value);
                    }
                }
                Ok(value)
            }
            Err(err) => {
                let message = err.user_message(&self.inner.default_error);
                if current {
                    tracing::debug!(error = %err, "Mutation failed");
                    {
                        let mut state = lock(&self.inner.state);
                        state.error = Some(message.clone());
                        state.loading = false;
                    }
                    if let Some(on_error) = &self.inner.on_error {
                        on_error(&err);
                    }
                }
                Err(message)
            }
        }
    }

    /// Clear `loading` and `error`.
    pub fn reset(&self) {
        *lock(&self.inner.state) = MutationState::default();
        self.inner.fence.bump();
    }

    pub fn loading(&self) -> bool {
        lock(&self.inner.state).loading
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.inner.state).error.clone()
    }
}

impl<T> ApiMutation<ApiRequest, T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// A mutation that sends whatever request it is given.
    pub fn request(backend: Arc<dyn ApiBackend>, options: MutationOptions<T>) -> Self {
        Self::new(
            move |request: ApiRequest| {
                let backend = Arc::clone(&backend);
                async move { decode_body(backend.send(request).await?) }
            },
            options,
        )
    }
}

impl<T> ApiMutation<Value, T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// A mutation that sends its argument as the JSON body of `method path`.
    pub fn with_body(
        backend: Arc<dyn ApiBackend>,
        method: Method,
        path: impl Into<String>,
        options: MutationOptions<T>,
    ) -> Self {
        let path = path.into();
        Self::new(
            move |body: Value| {
                let backend = Arc::clone(&backend);
                let request = ApiRequest::new(method, path.clone()).with_body(body);
                async move { decode_body(backend.send(request).await?) }
            },
            options,
        )
    }

    /// POST the argument to `path`.
    pub fn post(backend: Arc<dyn ApiBackend>, path: impl Into<String>, options: MutationOptions<T>) -> Self {
        Self::with_body(backend, Method::Post, path, options)
    }

    /// PUT the argument to `path`.
    pub fn put(backend: Arc<dyn ApiBackend>, path: impl Into<String>, options: MutationOptions<T>) -> Self {
        Self::with_body(backend, Method::Put, path, options)
    }
}

impl<T> ApiMutation<String, T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// A mutation that DELETEs the path it is given on each call.
    pub fn delete(backend: Arc<dyn ApiBackend>, options: MutationOptions<T>) -> Self {
        Self::new(
            move |path: String| {
                let backend = Arc::clone(&backend);
                async move { decode_body(backend.send(ApiRequest::new(Method::Delete, path)).await?) }
            },
            options,
        )
    }
}

impl<A, T> fmt::Debug for ApiMutation<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiMutation")
            .field("state", &*lock(&self.inner.state))
            .finish_non_exhaustive()
    }
}

fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|err| ApiError::new(format!("Unexpected response body: {}", err)))
}
