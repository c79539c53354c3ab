//! Reqwest-based REST backend adapter.
//!
//! Implements [`ApiBackend`] against the admin API: JSON in, JSON out, an
//! optional bearer token, and failed responses turned into [`ApiError`]s that
//! keep the response body so its `detail` can reach the user.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::StateConfig;
use crate::error::ApiError;
use crate::traits::{ApiBackend, ApiRequest, Method};

/// REST client for the admin API.
///
/// # Example
///
/// ```ignore
/// use panel_state::adapters::RestClient;
/// use panel_state::traits::{ApiBackend, ApiRequest};
///
/// let client = RestClient::with_url("http://localhost:8000/api").with_auth("token");
/// let projects = client.send(ApiRequest::get("/projects")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    /// Base URL every request path is appended to
    pub base_url: String,
    auth_token: Option<String>,
    client: Client,
}

impl RestClient {
    /// Create a client for `base_url`.
    pub fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            client: Client::new(),
        }
    }

    /// Create a client from the API settings of `config`.
    pub fn from_config(config: &StateConfig) -> Self {
        let client = Self::with_url(&config.api_url);
        match &config.api_token {
            Some(token) => client.with_auth(token),
            None => client,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, TLS).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl ApiBackend for RestClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, url = %url, "Sending API request");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %url, "API request failed");
            return Err(ApiError::from_response(status.as_u16(), data));
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = RestClient::with_url("http://localhost:8000/api/");
        assert_eq!(client.base_url, "http://localhost:8000/api");
        assert_eq!(client.url("/projects"), "http://localhost:8000/api/projects");
        assert_eq!(client.url("projects/1"), "http://localhost:8000/api/projects/1");
    }

    #[test]
    fn test_from_config_carries_token() {
        let config = StateConfig::default()
            .with_api_url("http://example.test")
            .with_api_token("secret");
        let client = RestClient::from_config(&config);

        assert_eq!(client.base_url, "http://example.test");
        assert_eq!(client.auth_token.as_deref(), Some("secret"));
    }
}
