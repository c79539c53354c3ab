//! Mock API backend for testing.
//!
//! Returns canned results per `(method, path)` route and records every request
//! for later verification.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;
use crate::traits::{ApiBackend, ApiRequest, Method};

/// A recorded request for verification in tests.
pub type RecordedRequest = ApiRequest;

#[derive(Debug, Clone)]
struct MockResponse {
    result: Result<Value, ApiError>,
    delay: Option<Duration>,
}

/// Mock API backend for testing.
///
/// Results queued for a route are served in order; the last one keeps being
/// served once the queue is down to it.
///
/// # Example
///
/// ```ignore
/// use panel_state::adapters::mock::MockBackend;
/// use panel_state::traits::{ApiBackend, ApiRequest, Method};
///
/// let backend = MockBackend::new();
/// backend.respond(Method::Get, "/projects", Ok(json!({"data": []})));
///
/// let body = backend.send(ApiRequest::get("/projects")).await?;
/// assert_eq!(body, json!({"data": []}));
/// assert_eq!(backend.requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for `method path`.
    pub fn respond(&self, method: Method, path: &str, result: Result<Value, ApiError>) {
        self.push(method, path, MockResponse { result, delay: None });
    }

    /// Queue a result that is only delivered after `delay`.
    pub fn respond_after(
        &self,
        method: Method,
        path: &str,
        delay: Duration,
        result: Result<Value, ApiError>,
    ) {
        self.push(
            method,
            path,
            MockResponse {
                result,
                delay: Some(delay),
            },
        );
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received for `method path`.
    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn push(&self, method: Method, path: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    fn next_response(&self, method: Method, path: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ApiBackend for MockBackend {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let response = self.next_response(request.method, &request.path);
        let (method, path) = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let Some(response) = response else {
            return Err(ApiError::from_response(
                404,
                serde_json::json!({ "detail": format!("No mock response for {} {}", method, path) }),
            ));
        };

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }
        response.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_serves_queued_results_in_order() {
        let backend = MockBackend::new();
        backend.respond(Method::Get, "/items", Ok(json!(1)));
        backend.respond(Method::Get, "/items", Ok(json!(2)));

        assert_eq!(backend.send(ApiRequest::get("/items")).await.unwrap(), json!(1));
        assert_eq!(backend.send(ApiRequest::get("/items")).await.unwrap(), json!(2));
        // last result keeps being served
        assert_eq!(backend.send(ApiRequest::get("/items")).await.unwrap(), json!(2));
        assert_eq!(backend.call_count(Method::Get, "/items"), 3);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let backend = MockBackend::new();
        let err = backend
            .send(ApiRequest::new(Method::Delete, "/nope"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.detail(), Some("No mock response for DELETE /nope"));
        assert_eq!(backend.requests().len(), 1);
    }
}
