//! # Paginated Fetch Hook
//!
//! [`UsePaginatedFetch`] is the list-view counterpart of
//! [`UseFetch`](crate::UseFetch): it owns the page/limit cursor and reruns
//! the fetch whenever the cursor or the external dependencies change.
//!
//! The fetch function always receives a canonical [`ListPage`]; envelope
//! shapes are resolved before that by the API adapter. When the server
//! leaves out `totalPages` it is derived as `ceil(total / limit)`.

use crate::envelope::ListPage;
use crate::error::ApiError;
use crate::resource::{ListQuery, Resource, ResourceApi};
use crate::state::{total_pages_for, PageQuery, PaginationState};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Boxed async page loader: `(page query, deps) -> page`.
pub type PageFetchFn<D, T> =
    Arc<dyn Fn(PageQuery, D) -> BoxFuture<'static, Result<ListPage<T>, ApiError>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct PagedState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: PaginationState,
}

impl<T> PagedState<T> {
    fn initial(query: PageQuery) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: PaginationState::new(query),
        }
    }
}

pub struct UsePaginatedFetch<D, T> {
    fetch_fn: PageFetchFn<D, T>,
    initial: PageQuery,
    state: watch::Sender<PagedState<T>>,
    deps: Mutex<D>,
    generation: AtomicU64,
}

impl<D, T> UsePaginatedFetch<D, T>
where
    D: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(fetch_fn: PageFetchFn<D, T>, initial: PageQuery, deps: D) -> Self {
        let (state, _) = watch::channel(PagedState::initial(initial));
        Self {
            fetch_fn,
            initial,
            state,
            deps: Mutex::new(deps),
            generation: AtomicU64::new(0),
        }
    }

    /// Loads the current page with the current dependencies.
    pub async fn fetch(&self) -> Result<ListPage<T>, ApiError> {
        let query = self.state.borrow().pagination.query();
        let deps = self.deps.lock().unwrap_or_else(|e| e.into_inner()).clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = (self.fetch_fn)(query, deps).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, page = query.page, "Discarding stale page");
            return result;
        }

        match &result {
            Ok(page) => {
                let total = page.total.unwrap_or(0);
                let total_pages = page
                    .total_pages
                    .unwrap_or_else(|| total_pages_for(total, query.limit));
                debug!(page = query.page, total, total_pages, "Page loaded");
                self.state.send_modify(|s| {
                    s.items = page.items.clone();
                    s.loading = false;
                    s.pagination.total = total;
                    s.pagination.total_pages = total_pages;
                });
            }
            Err(e) => {
                let message = e.display_message();
                warn!(error = %message, page = query.page, "Page fetch failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
            }
        }
        result
    }

    /// Moves to page `page` and loads it.
    ///
    /// Pages below 1 and the current page are ignored. Returns `true` when
    /// a fetch was dispatched.
    pub async fn go_to_page(&self, page: u32) -> bool {
        if page < 1 || self.state.borrow().pagination.page == page {
            return false;
        }
        self.state.send_modify(|s| s.pagination.page = page);
        let _ = self.fetch().await;
        true
    }

    /// Changes the page size and goes back to page 1.
    pub async fn change_limit(&self, limit: u32) -> bool {
        if limit == 0 || self.state.borrow().pagination.limit == limit {
            return false;
        }
        self.state.send_modify(|s| {
            s.pagination.limit = limit;
            s.pagination.page = 1;
        });
        let _ = self.fetch().await;
        true
    }

    /// Stores new external dependencies and reloads from page 1 if they changed.
    pub async fn set_deps(&self, deps: D) -> bool {
        {
            let mut current = self.deps.lock().unwrap_or_else(|e| e.into_inner());
            if *current == deps {
                return false;
            }
            *current = deps;
        }
        self.state.send_modify(|s| s.pagination.page = 1);
        let _ = self.fetch().await;
        true
    }

    /// Restores the initial page/limit and clears items and error.
    ///
    /// Does not fetch. Any request still in flight is ignored when it lands.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let initial = self.initial;
        self.state.send_replace(PagedState::initial(initial));
    }

    pub fn snapshot(&self) -> PagedState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PagedState<T>> {
        self.state.subscribe()
    }
}

/// Adapts a resource's list endpoint into a [`PageFetchFn`].
///
/// The deps value is a [`ListQuery`] of filters; page and limit are taken
/// from the hook's cursor.
pub fn list_fetcher<T: Resource>(api: Arc<dyn ResourceApi<T>>) -> PageFetchFn<ListQuery, T> {
    Arc::new(move |page: PageQuery, filters: ListQuery| {
        let api = api.clone();
        async move {
            let query = filters.page(page.page, page.limit);
            api.list(&query).await
        }
        .boxed()
    })
}
