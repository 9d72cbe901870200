//! # Debounced Search Hook
//!
//! [`DebouncedSearch`] turns a stream of query edits into at most one remote
//! search per pause in typing. Every [`set_query`](DebouncedSearch::set_query)
//! aborts the pending timer task and schedules a new one, so only the last
//! edit inside the delay window reaches the server.
//!
//! A blank query never hits the network; it clears the results at once.
//! Dropping the hook aborts whatever is still pending.

use crate::error::ApiError;
use crate::resource::{ListQuery, Resource, ResourceApi};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Boxed async search call.
pub type SearchFn<T> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<Vec<T>, ApiError>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState<T> {
    pub query: String,
    pub results: Vec<T>,
    /// True from the moment the timer fires until the search resolves.
    pub searching: bool,
    pub error: Option<String>,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            searching: false,
            error: None,
        }
    }
}

pub struct DebouncedSearch<T> {
    search_fn: SearchFn<T>,
    delay: Duration,
    state: Arc<watch::Sender<SearchState<T>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> DebouncedSearch<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(search_fn: SearchFn<T>) -> Self {
        Self::with_delay(search_fn, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(search_fn: SearchFn<T>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            search_fn,
            delay,
            state: Arc::new(state),
            pending: Mutex::new(None),
        }
    }

    /// Records a query edit and (re)starts the debounce timer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.cancel_pending();
        self.state.send_modify(|s| s.query = query.clone());

        if query.trim().is_empty() {
            self.state.send_modify(|s| {
                s.results.clear();
                s.searching = false;
                s.error = None;
            });
            return;
        }

        let search_fn = self.search_fn.clone();
        let state = self.state.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(%query, "Searching");
            state.send_modify(|s| s.searching = true);

            match search_fn(query).await {
                Ok(results) => state.send_modify(|s| {
                    s.results = results;
                    s.searching = false;
                    s.error = None;
                }),
                Err(e) => {
                    let message = e.display_message();
                    warn!(error = %message, "Search failed");
                    state.send_modify(|s| {
                        s.results.clear();
                        s.searching = false;
                        s.error = Some(message);
                    });
                }
            }
        });
        *self.pending.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
    }

    /// Resets query, results and error synchronously.
    pub fn clear_search(&self) {
        self.cancel_pending();
        self.state.send_replace(SearchState::default());
    }

    pub fn snapshot(&self) -> SearchState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState<T>> {
        self.state.subscribe()
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

impl<T> Drop for DebouncedSearch<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

/// Searches a resource through its list endpoint (`?search=`).
pub fn search_via_list<T: Resource>(api: Arc<dyn ResourceApi<T>>) -> SearchFn<T> {
    Arc::new(move |query: String| {
        let api = api.clone();
        async move {
            let page = api.list(&ListQuery::new().search(query)).await?;
            Ok(page.items)
        }
        .boxed()
    })
}
