//! # Post Client
//!
//! Blog posts: drafting and publishing.
use crate::model::{BlogPost, PostCreate, PostId, PostStatus, PostUpdate};
use admin_framework::{CrudClient, FrameworkError, ResourceHandle};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PostError {
    #[error("{0}")]
    Store(String),
}

#[derive(Clone)]
pub struct PostClient {
    inner: CrudClient<BlogPost>,
}

impl PostClient {
    pub fn new(inner: CrudClient<BlogPost>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_post(&self, params: PostCreate) -> Result<BlogPost, PostError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_post(&self, id: PostId, update: PostUpdate) -> Result<BlogPost, PostError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    pub async fn publish(&self, id: PostId) -> Result<BlogPost, PostError> {
        self.update_post(id, PostUpdate::status(PostStatus::Published))
            .await
    }

    pub async fn unpublish(&self, id: PostId) -> Result<BlogPost, PostError> {
        self.update_post(id, PostUpdate::status(PostStatus::Draft))
            .await
    }
}

#[async_trait]
impl ResourceHandle<BlogPost> for PostClient {
    type Error = PostError;

    fn inner(&self) -> &CrudClient<BlogPost> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        PostError::Store(e.display_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_framework::mock::{create_mock_client, expect_update};

    #[tokio::test]
    async fn test_publish_sends_status_only() {
        let (client, mut receiver) = create_mock_client::<BlogPost>(10);
        let posts = PostClient::new(client);

        let task = tokio::spawn(async move { posts.publish(PostId(4)).await });

        let (id, update, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, PostId(4));
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "status": "published" })
        );
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "id": 4, "title": "Hello", "slug": "hello", "status": "published"
        }))
        .unwrap();
        responder.send(Ok(post)).unwrap();

        assert_eq!(task.await.unwrap().unwrap().status, PostStatus::Published);
    }

    #[tokio::test]
    async fn test_closed_store() {
        let (client, receiver) = create_mock_client::<BlogPost>(10);
        drop(receiver);
        let posts = PostClient::new(client);

        let err = posts.unpublish(PostId(1)).await.unwrap_err();
        assert_eq!(err, PostError::Store("Store closed".into()));
    }
}
