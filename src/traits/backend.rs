//! REST backend trait abstraction.
//!
//! Provides a trait-based abstraction over the admin API so that resources
//! and mutations can be built on a real HTTP client or on a mock.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against the admin API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the backend's base URL (e.g. `/projects`)
    pub path: String,
    /// Query string pairs, in order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Append query pairs.
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Trait for calls against the admin REST API.
///
/// Implementations must signal failure with `Err` (never with a success value
/// carrying an error flag); a failed HTTP response should carry its status and
/// body so the `detail` field can be shown to the user.
///
/// # Example
///
/// ```ignore
/// use panel_state::traits::{ApiBackend, ApiRequest};
///
/// async fn project_count<B: ApiBackend>(backend: &B) -> Result<u64, ApiError> {
///     let body = backend.send(ApiRequest::get("/projects")).await?;
///     Ok(body["total"].as_u64().unwrap_or(0))
/// }
/// ```
#[async_trait]
pub trait ApiBackend: Send + Sync {
    /// Send a request and return the parsed JSON body of a success response.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::new(Method::Post, "/customers")
            .with_query([("dry_run", "1")])
            .with_body(json!({"name": "Acme"}));

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/customers");
        assert_eq!(req.query, vec![("dry_run".to_string(), "1".to_string())]);
        assert_eq!(req.body, Some(json!({"name": "Acme"})));
    }
}
