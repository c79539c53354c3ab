//! Configuration for the state primitives.
//!
//! Every tunable has a default matching the admin console's behavior; the
//! `PANEL_STATE_*` environment variables override them.

use std::path::PathBuf;
use std::time::Duration;

use crate::state::SettlePolicy;

/// Default message shown when a resource fetch fails without a better message.
pub const DEFAULT_REQUEST_FAILED_MESSAGE: &str = "请求失败";

/// Default message shown when a mutation fails without a better message.
pub const DEFAULT_OPERATION_FAILED_MESSAGE: &str = "操作失败";

/// Default quiet period for debounced values and callbacks.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default time a closed modal keeps its payload for exit animations.
pub const DEFAULT_MODAL_GRACE_MS: u64 = 200;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Configuration shared by the primitives and the REST adapter.
///
/// Use the builder pattern to customize.
///
/// # Example
///
/// ```ignore
/// use panel_state::config::StateConfig;
///
/// let config = StateConfig::default()
///     .with_api_url("http://localhost:8000/api")
///     .with_page_size(20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StateConfig {
    /// Base URL of the admin API
    pub api_url: String,
    /// Bearer token sent with every API request
    pub api_token: Option<String>,
    /// Location of the durable store file (default: platform data dir)
    pub store_path: Option<PathBuf>,
    /// Quiet period for debounced primitives
    pub debounce_delay: Duration,
    /// Grace period before a closed modal drops its payload
    pub modal_grace: Duration,
    /// Rows per page for new paginators
    pub page_size: u64,
    /// How concurrent settlements of one async primitive are applied
    pub settle_policy: SettlePolicy,
    /// Fallback message for failed resource fetches
    pub request_failed_message: String,
    /// Fallback message for failed mutations
    pub operation_failed_message: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            store_path: None,
            debounce_delay: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            modal_grace: Duration::from_millis(DEFAULT_MODAL_GRACE_MS),
            page_size: DEFAULT_PAGE_SIZE,
            settle_policy: SettlePolicy::default(),
            request_failed_message: DEFAULT_REQUEST_FAILED_MESSAGE.to_string(),
            operation_failed_message: DEFAULT_OPERATION_FAILED_MESSAGE.to_string(),
        }
    }
}

impl StateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the API bearer token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the durable store file location.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Set the debounce quiet period.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Set the modal grace period.
    pub fn with_modal_grace(mut self, grace: Duration) -> Self {
        self.modal_grace = grace;
        self
    }

    /// Set the default page size (values below 1 become 1).
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the settlement policy for async primitives.
    pub fn with_settle_policy(mut self, policy: SettlePolicy) -> Self {
        self.settle_policy = policy;
        self
    }

    /// Build a config from `PANEL_STATE_*` environment variables.
    ///
    /// Unset variables keep their defaults. Invalid values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PANEL_STATE_API_URL") {
            config.api_url = url;
        }
        if let Ok(token) = std::env::var("PANEL_STATE_API_TOKEN") {
            if !token.is_empty() {
                config.api_token = Some(token);
            }
        }
        if let Ok(path) = std::env::var("PANEL_STATE_STORE_PATH") {
            config.store_path = Some(PathBuf::from(path));
        }
        if let Some(ms) = env_u64("PANEL_STATE_DEBOUNCE_MS") {
            config.debounce_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("PANEL_STATE_MODAL_GRACE_MS") {
            config.modal_grace = Duration::from_millis(ms);
        }
        if let Some(size) = env_u64("PANEL_STATE_PAGE_SIZE") {
            config = config.with_page_size(size);
        }
        if let Ok(raw) = std::env::var("PANEL_STATE_SETTLE_POLICY") {
            match raw.parse::<SettlePolicy>() {
                Ok(policy) => config.settle_policy = policy,
                Err(err) => tracing::warn!(value = %raw, error = %err, "Ignoring PANEL_STATE_SETTLE_POLICY"),
            }
        }

        config
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(variable = name, value = %raw, error = %err, "Ignoring invalid numeric setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StateConfig::default();
        assert_eq!(config.debounce_delay, Duration::from_millis(500));
        assert_eq!(config.modal_grace, Duration::from_millis(200));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.settle_policy, SettlePolicy::LastSettled);
        assert_eq!(config.request_failed_message, "请求失败");
        assert_eq!(config.operation_failed_message, "操作失败");
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_builder() {
        let config = StateConfig::new()
            .with_api_url("http://example.test")
            .with_api_token("tok")
            .with_page_size(0)
            .with_settle_policy(SettlePolicy::LatestIssued);

        assert_eq!(config.api_url, "http://example.test");
        assert_eq!(config.api_token.as_deref(), Some("tok"));
        assert_eq!(config.page_size, 1);
        assert_eq!(config.settle_policy, SettlePolicy::LatestIssued);
    }
}
