//! # User Client
use crate::model::{User, UserCreate, UserId, UserRole, UserUpdate};
use admin_framework::{CrudClient, FrameworkError, ResourceHandle};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    Store(String),
}

#[derive(Clone)]
pub struct UserClient {
    inner: CrudClient<User>,
}

impl UserClient {
    pub fn new(inner: CrudClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UserError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, id: UserId, role: UserRole) -> Result<User, UserError> {
        self.update_user(
            id,
            UserUpdate {
                role: Some(role),
                ..Default::default()
            },
        )
        .await
    }

    /// Blocks the account from logging in. The record is kept.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: UserId) -> Result<User, UserError> {
        self.update_user(
            id,
            UserUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl ResourceHandle<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &CrudClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        UserError::Store(e.display_message())
    }
}
