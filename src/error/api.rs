//! Operation failures reported by a backend call.

use serde_json::Value;

/// Body and status of a failed HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed response body (`Value::Null` when the body was not JSON)
    pub data: Value,
}

/// A failed backend call.
///
/// Carries the error's own message and, when the failure came from an HTTP
/// response, the response status and body. The body may carry a `detail`
/// string meant for the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    response: Option<ErrorResponse>,
}

impl ApiError {
    /// Create an error that never reached a response (transport failure,
    /// client-side rejection).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// Create an error from a non-success HTTP response.
    pub fn from_response(status: u16, data: Value) -> Self {
        Self {
            message: format!("Request failed with status code {}", status),
            response: Some(ErrorResponse { status, data }),
        }
    }

    /// Attach (or replace) the response carried by this error.
    pub fn with_response(mut self, status: u16, data: Value) -> Self {
        self.response = Some(ErrorResponse { status, data });
        self
    }

    /// The error's own message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failed response, if any.
    pub fn response(&self) -> Option<&ErrorResponse> {
        self.response.as_ref()
    }

    /// HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// The `response.data.detail` string, if present and non-empty.
    pub fn detail(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(|r| r.data.get("detail"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Message to show the user.
    ///
    /// Prefers the server-supplied `detail`, then the error's own message,
    /// then `default`.
    pub fn user_message(&self, default: &str) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_string();
        }
        if !self.message.is_empty() {
            return self.message.clone();
        }
        default.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_wins_over_message() {
        let err = ApiError::new("Network Error")
            .with_response(400, json!({"detail": "API Error Message"}));
        assert_eq!(err.user_message("请求失败"), "API Error Message");
    }

    #[test]
    fn test_message_used_without_detail() {
        let err = ApiError::new("Network Error");
        assert_eq!(err.user_message("请求失败"), "Network Error");

        let err = ApiError::new("boom").with_response(500, json!({"error": "x"}));
        assert_eq!(err.user_message("请求失败"), "boom");
    }

    #[test]
    fn test_empty_detail_and_message_fall_back_to_default() {
        let err = ApiError::new("").with_response(500, json!({"detail": ""}));
        assert_eq!(err.user_message("操作失败"), "操作失败");
    }

    #[test]
    fn test_non_string_detail_is_ignored() {
        let err = ApiError::new("bad request")
            .with_response(422, json!({"detail": [{"loc": ["body", "name"]}]}));
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("请求失败"), "bad request");
    }

    #[test]
    fn test_from_response_uses_status_message() {
        let err = ApiError::from_response(404, Value::Null);
        assert_eq!(err.message(), "Request failed with status code 404");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }
}
