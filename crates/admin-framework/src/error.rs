//! # Framework Errors
//!
//! Every hook funnels failures through [`ApiError::display_message`], so the
//! string a component renders is produced in exactly one place.

use serde_json::Value;

/// Message shown when nothing more specific can be extracted from an error.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors produced while talking to the remote API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: Option<Value> },

    /// The server answered 2xx but the envelope reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn decode(err: impl std::fmt::Display) -> Self {
        ApiError::Decode(err.to_string())
    }

    /// A 401 from the server. Session checks treat this as "not logged in".
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Reduces the error to the string shown to the user.
    ///
    /// Lookup order: `body.error.message`, `body.message`, the error's own
    /// message, then [`GENERIC_ERROR_MESSAGE`].
    pub fn display_message(&self) -> String {
        if let ApiError::Status { body: Some(body), .. } = self {
            let nested = body.pointer("/error/message").and_then(Value::as_str);
            let flat = body.get("message").and_then(Value::as_str);
            if let Some(message) = nested.into_iter().chain(flat).find(|m| !m.trim().is_empty()) {
                return message.to_string();
            }
        }

        let own = self.to_string();
        if own.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            own
        }
    }
}

/// Errors that can occur within the framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FrameworkError {
    pub fn display_message(&self) -> String {
        match self {
            FrameworkError::Api(e) => e.display_message(),
            other => other.to_string(),
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            FrameworkError::Api(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_error_message_wins() {
        let err = ApiError::Status {
            status: 422,
            body: Some(json!({
                "message": "Validation failed",
                "error": { "message": "Slug already taken" }
            })),
        };
        assert_eq!(err.display_message(), "Slug already taken");
    }

    #[test]
    fn test_flat_message_used_when_nested_missing() {
        let err = ApiError::Status {
            status: 404,
            body: Some(json!({ "message": "Product not found" })),
        };
        assert_eq!(err.display_message(), "Product not found");
    }

    #[test]
    fn test_falls_back_to_own_message() {
        let err = ApiError::Status {
            status: 500,
            body: Some(json!({ "message": "" })),
        };
        assert_eq!(err.display_message(), "Request failed with status code 500");

        let err = ApiError::Transport("connection refused".into());
        assert_eq!(err.display_message(), "Network error: connection refused");
    }

    #[test]
    fn test_generic_fallback() {
        let err = ApiError::Rejected(String::new());
        assert_eq!(err.display_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Status { status: 401, body: None };
        assert!(err.is_unauthorized());
        assert!(!ApiError::Status { status: 403, body: None }.is_unauthorized());
        assert!(!ApiError::Transport("x".into()).is_unauthorized());
    }

    #[test]
    fn test_framework_error_delegates() {
        let err = FrameworkError::from(ApiError::Status {
            status: 400,
            body: Some(json!({ "message": "Bad input" })),
        });
        assert_eq!(err.display_message(), "Bad input");
        assert_eq!(FrameworkError::StoreClosed.display_message(), "Store closed");
    }
}
