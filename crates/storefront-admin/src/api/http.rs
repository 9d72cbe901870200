//! Thin JSON client over the storefront REST backend.
//!
//! Authentication is cookie based: the login response sets the session
//! cookie and the client's cookie store sends it back on every request.

use crate::config::AdminConfig;
use admin_framework::ApiError;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Shared HTTP client. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

pub(crate) fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

impl ApiClient {
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET with query string pairs.
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "PUT");
        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    /// POST `multipart/form-data`. Multipart bodies are streamed, so the
    /// request is never retried.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "POST multipart");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }
}

/// 2xx: the JSON body, or `Null` when empty. Anything else becomes
/// [`ApiError::Status`] carrying whatever JSON the server sent.
async fn handle_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport)?;

    if status.is_success() {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(&bytes).map_err(ApiError::decode);
    }

    let body = serde_json::from_slice::<Value>(&bytes).ok();
    // Callers decide how loud a failure is; a 401 from `auth/me` is routine.
    debug!(status = status.as_u16(), "Request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}
