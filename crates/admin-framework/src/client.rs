//! # CRUD Client
//!
//! The cloneable handle to a [`CrudActor`](crate::CrudActor). Mutations go
//! through the actor's channel; reads come straight from the watch
//! channel the actor publishes on.

use crate::actor::CrudCollection;
use crate::error::FrameworkError;
use crate::message::CrudRequest;
use crate::resource::{ListQuery, Resource};
use tokio::sync::{mpsc, oneshot, watch};

#[derive(Clone)]
pub struct CrudClient<T: Resource> {
    sender: mpsc::Sender<CrudRequest<T>>,
    state: watch::Receiver<CrudCollection<T>>,
}

impl<T: Resource> CrudClient<T> {
    pub fn new(
        sender: mpsc::Sender<CrudRequest<T>>,
        state: watch::Receiver<CrudCollection<T>>,
    ) -> Self {
        Self { sender, state }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> CrudRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::StoreClosed)?;
        response.await.map_err(|_| FrameworkError::StoreDropped)?
    }

    /// Replaces the local list with the server's and returns it.
    pub async fn fetch_all(&self, query: ListQuery) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| CrudRequest::FetchAll { query, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<T, FrameworkError> {
        self.request(|respond_to| CrudRequest::Get { id, respond_to })
            .await
    }

    pub async fn create(&self, params: T::Create) -> Result<T, FrameworkError> {
        self.request(|respond_to| CrudRequest::Create { params, respond_to })
            .await
    }

    /// Returns the record after the server's fields were merged in.
    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| CrudRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn remove(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| CrudRequest::Remove { id, respond_to })
            .await
    }

    pub fn snapshot(&self) -> CrudCollection<T> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    /// The local copy of one record, without a round trip.
    pub fn find(&self, id: &T::Id) -> Option<T> {
        self.state.borrow().find(id).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<CrudCollection<T>> {
        self.state.clone()
    }
}
