//! # CRUD Messages
//!
//! Requests sent from a [`CrudClient`](crate::CrudClient) to its
//! [`CrudActor`](crate::CrudActor). Each variant carries a oneshot sender
//! the actor answers on.

use crate::error::FrameworkError;
use crate::resource::{ListQuery, Resource};
use tokio::sync::oneshot;

/// Channel the actor answers a request on.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum CrudRequest<T: Resource> {
    /// Replace the local list with the server's list.
    FetchAll {
        query: ListQuery,
        respond_to: Response<Vec<T>>,
    },
    /// Load one record and refresh its local copy, if any.
    Get {
        id: T::Id,
        respond_to: Response<T>,
    },
    /// Create remotely, then prepend.
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    /// Update remotely, then merge the returned fields by id.
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    /// Delete remotely, then filter out by id.
    Remove { id: T::Id, respond_to: Response<()> },
}
