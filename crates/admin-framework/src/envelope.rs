//! # Response Envelopes
//!
//! The backend wraps payloads inconsistently: list endpoints answer with a
//! bare array, `{data: [...]}` or `{items: [...]}`, auth endpoints with
//! `{user}` or `{success, data: {user}}`. The adapters here turn each shape
//! into one canonical DTO. API implementations call them once at the
//! boundary, so hooks only ever see [`ListPage`] and plain entities.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Canonical shape of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Total number of records on the server, when reported.
    pub total: Option<u64>,
    /// Total number of pages, when reported.
    pub total_pages: Option<u64>,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total: None,
            total_pages: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_total_pages(mut self, total_pages: u64) -> Self {
        self.total_pages = Some(total_pages);
        self
    }
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn present<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| !v.is_null())
}

/// Normalizes a list response: bare array, then `.data`, then `.items`.
pub fn list_page<T: DeserializeOwned>(body: Value) -> Result<ListPage<T>, ApiError> {
    let (items, total, total_pages) = match body {
        Value::Array(_) => (body, None, None),
        Value::Object(_) => {
            let items = present(&body, "data")
                .or_else(|| present(&body, "items"))
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new()));
            let total = body.get("total").and_then(Value::as_u64);
            let total_pages = body.get("totalPages").and_then(Value::as_u64);
            (items, total, total_pages)
        }
        _ => (Value::Array(Vec::new()), None, None),
    };

    Ok(ListPage {
        items: serde_json::from_value(items).map_err(ApiError::decode)?,
        total,
        total_pages,
    })
}

/// Unwraps `{data: {...}}` to the inner object; any other body is returned as is.
pub fn fields(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decodes a single-resource response.
pub fn item<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(fields(body)).map_err(ApiError::decode)
}

/// Extracts the session user from an auth response.
///
/// Accepts `{success, data: {user}}` and `{user}`. An explicit
/// `success: false` is reported as [`ApiError::Rejected`].
pub fn session_user<U: DeserializeOwned>(body: Value) -> Result<U, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .pointer("/error/message")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(ApiError::Rejected(message.to_string()));
    }

    let user = body
        .pointer("/data/user")
        .filter(|v| !v.is_null())
        .or_else(|| present(&body, "user"))
        .cloned()
        .ok_or_else(|| ApiError::Decode("response did not contain a user".into()))?;

    serde_json::from_value(user).map_err(ApiError::decode)
}
