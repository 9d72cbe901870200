use super::ApiClient;
use admin_framework::envelope::{fields, item, list_page};
use admin_framework::{ApiError, ListPage, ListQuery, Resource, ResourceApi};
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;

/// [`ResourceApi`] over `/{PATH}` and `/{PATH}/{id}`.
pub struct HttpResource<T> {
    client: ApiClient,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> HttpResource<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn member(id: &T::Id) -> String {
        format!("{}/{}", T::PATH, id)
    }
}

#[async_trait]
impl<T: Resource> ResourceApi<T> for HttpResource<T> {
    async fn list(&self, query: &ListQuery) -> Result<ListPage<T>, ApiError> {
        let body = self.client.get(T::PATH, &query.to_pairs()).await?;
        list_page(body)
    }

    async fn get(&self, id: &T::Id) -> Result<T, ApiError> {
        let body = self.client.get(&Self::member(id), &[]).await?;
        item(body)
    }

    async fn create(&self, params: &T::Create) -> Result<T, ApiError> {
        let body = self.client.post_json(T::PATH, params).await?;
        item(body)
    }

    async fn update(&self, id: &T::Id, update: &T::Update) -> Result<Value, ApiError> {
        let body = self.client.put_json(&Self::member(id), update).await?;
        Ok(fields(body))
    }

    async fn delete(&self, id: &T::Id) -> Result<(), ApiError> {
        self.client.delete(&Self::member(id)).await?;
        Ok(())
    }
}
