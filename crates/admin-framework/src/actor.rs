//! # CRUD Store Actor
//!
//! [`CrudActor`] keeps a local mirror of one remote collection. It is the
//! "server" half of a store: it owns the [`CrudCollection`], processes
//! [`CrudRequest`]s one at a time and publishes every change on a watch
//! channel. The matching [`CrudClient`] is the cloneable handle.
//!
//! The mirror only changes after the server confirmed a mutation, so a
//! failed request leaves the list exactly as it was:
//!
//! * `create` prepends the returned record
//! * `update` shallow-merges the returned fields into the record with the
//!   same id, keeping its position
//! * `remove` filters the record out by id
//! * `fetch_all` replaces the list wholesale
//!
//! Because requests are handled sequentially, two concurrent mutations
//! can never interleave their writes to the list.
//!
//! # Usage
//!
//! ```rust,ignore
//! let (actor, client) = CrudActor::<Tag>::new(32);
//! let handle = tokio::spawn(actor.run(api));
//! client.fetch_all(ListQuery::new()).await?;
//! drop(client);
//! handle.await?;
//! ```
//!
//! The API is passed to [`CrudActor::run`] rather than `new`, so clients
//! can be handed out before the backend is wired up.

use crate::client::CrudClient;
use crate::error::{ApiError, FrameworkError};
use crate::message::CrudRequest;
use crate::resource::{merge_fields, Resource, ResourceApi};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Local mirror of a remote collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudCollection<T> {
    pub items: Vec<T>,
    /// True while any request is in flight.
    pub loading: bool,
    /// Display message of the last failed request, cleared on the next one.
    pub error: Option<String>,
}

impl<T> Default for CrudCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Resource> CrudCollection<T> {
    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct CrudActor<T: Resource> {
    receiver: mpsc::Receiver<CrudRequest<T>>,
    state: watch::Sender<CrudCollection<T>>,
}

impl<T: Resource> CrudActor<T> {
    /// Creates the actor and its client.
    pub fn new(buffer_size: usize) -> (Self, CrudClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (state, state_rx) = watch::channel(CrudCollection::default());
        let actor = Self { receiver, state };
        let client = CrudClient::new(sender, state_rx);
        (actor, client)
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self, api: Arc<dyn ResourceApi<T>>) {
        let resource = T::PATH;
        info!(resource, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            self.begin();
            match msg {
                CrudRequest::FetchAll { query, respond_to } => {
                    debug!(resource, ?query, "Fetch all");
                    let result = api.list(&query).await.map(|page| {
                        let items = page.items;
                        self.state.send_modify(|s| s.items = items.clone());
                        info!(resource, count = items.len(), "Fetched");
                        items
                    });
                    let _ = respond_to.send(self.finish(result));
                }
                CrudRequest::Get { id, respond_to } => {
                    debug!(resource, %id, "Get");
                    let result = api.get(&id).await.map(|item| {
                        self.state.send_modify(|s| {
                            if let Some(slot) = s.items.iter_mut().find(|i| i.id() == &id) {
                                *slot = item.clone();
                            }
                        });
                        item
                    });
                    let _ = respond_to.send(self.finish(result));
                }
                CrudRequest::Create { params, respond_to } => {
                    debug!(resource, ?params, "Create");
                    let result = api.create(&params).await.map(|item| {
                        self.state.send_modify(|s| s.items.insert(0, item.clone()));
                        info!(resource, id = %item.id(), "Created");
                        item
                    });
                    let _ = respond_to.send(self.finish(result));
                }
                CrudRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(resource, %id, ?update, "Update");
                    let result = match api.update(&id, &update).await {
                        Ok(fields) => match self.apply_update(&id, &fields) {
                            Some(result) => result,
                            None => api.get(&id).await,
                        },
                        Err(e) => Err(e),
                    };
                    let _ = respond_to.send(self.finish(result));
                }
                CrudRequest::Remove { id, respond_to } => {
                    debug!(resource, %id, "Remove");
                    let result = api.delete(&id).await.map(|()| {
                        self.state.send_modify(|s| s.items.retain(|i| i.id() != &id));
                        info!(resource, %id, "Removed");
                    });
                    let _ = respond_to.send(self.finish(result));
                }
            }
        }

        info!(resource, size = self.state.borrow().items.len(), "Shutdown");
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    /// Clears `loading`, records a failure and wraps the result for the client.
    fn finish<R>(&self, result: Result<R, ApiError>) -> Result<R, FrameworkError> {
        match result {
            Ok(value) => {
                self.state.send_modify(|s| s.loading = false);
                Ok(value)
            }
            Err(e) => {
                let message = e.display_message();
                warn!(resource = T::PATH, error = %message, "Request failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(FrameworkError::Api(e))
            }
        }
    }

    /// Merges confirmed fields into the listed record. An unlisted record is
    /// decoded from the fields; `None` means they are partial and the record
    /// has to be loaded. The list is left alone for unlisted records.
    fn apply_update(
        &self,
        id: &T::Id,
        fields: &serde_json::Value,
    ) -> Option<Result<T, ApiError>> {
        let current = self.state.borrow().find(id).cloned();
        match current {
            Some(item) => {
                let merged = match merge_fields(&item, fields) {
                    Ok(merged) => merged,
                    Err(e) => return Some(Err(e)),
                };
                self.state.send_modify(|s| {
                    if let Some(slot) = s.items.iter_mut().find(|i| i.id() == id) {
                        *slot = merged.clone();
                    }
                });
                info!(resource = T::PATH, %id, "Updated");
                Some(Ok(merged))
            }
            None => {
                debug!(resource = T::PATH, %id, "Updated record not in local list");
                serde_json::from_value(fields.clone()).ok().map(Ok)
            }
        }
    }
}
