use super::ApiClient;
use crate::model::User;
use admin_framework::envelope::session_user;
use admin_framework::{ApiError, AuthApi, Credentials};
use async_trait::async_trait;
use serde_json::json;

/// Session endpoints under `/auth`.
pub struct HttpAuthApi {
    client: ApiClient,
}

impl HttpAuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi<User> for HttpAuthApi {
    async fn current_user(&self) -> Result<User, ApiError> {
        let body = self.client.get("auth/me", &[]).await?;
        session_user(body)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = self.client.post_json("auth/login", credentials).await?;
        session_user(body)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.client.post_json("auth/logout", &json!({})).await?;
        Ok(())
    }

    async fn switch_role(&self, role: &str) -> Result<User, ApiError> {
        let body = self
            .client
            .post_json("auth/switch-role", &json!({ "role": role }))
            .await?;
        session_user(body)
    }
}
