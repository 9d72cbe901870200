//! # ResourceHandle Trait
//!
//! Domain wrappers (`ProductClient`, `OrderClient`, ...) implement this to
//! inherit the plain store operations, and add their own on top.
use crate::{CrudClient, FrameworkError, ListQuery, Resource};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard store
/// operations.
///
/// # Example
///
/// ```rust,ignore
/// struct TagClient {
///     inner: CrudClient<Tag>,
/// }
///
/// #[async_trait]
/// impl ResourceHandle<Tag> for TagClient {
///     type Error = TagError;
///
///     fn inner(&self) -> &CrudClient<Tag> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         TagError::Store(e.display_message())
///     }
/// }
///
/// // fetch_all(), get(), remove() and items() come for free.
/// let tags = client.fetch_all(ListQuery::new()).await?;
/// ```
#[async_trait]
pub trait ResourceHandle<T: Resource>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner store client.
    fn inner(&self) -> &CrudClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn fetch_all(&self, query: ListQuery) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().fetch_all(query).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().remove(id).await.map_err(Self::map_error)
    }

    /// The local mirror as last published by the store.
    fn items(&self) -> Vec<T> {
        self.inner().items()
    }
}
