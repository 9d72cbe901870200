//! # Fetch Hook
//!
//! [`UseFetch`] wraps one async call and tracks its [`RequestState`].
//! The call's arguments double as the dependency value: when
//! [`UseFetch::set_deps`] receives a value different from the stored one,
//! the call re-runs.
//!
//! Every dispatch takes a generation number. A response that arrives after
//! a newer request was dispatched is handed back to its caller but never
//! written to state, so a slow stale response cannot overwrite fresh data.
//!
//! ```rust,ignore
//! let fetch = UseFetch::new(fetch_fn, product_id);
//! fetch.mount().await;
//! let mut rx = fetch.subscribe();
//! // ... later
//! fetch.set_deps(other_id).await;
//! ```

use crate::error::ApiError;
use crate::state::RequestState;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Boxed async function invoked by [`UseFetch`].
pub type FetchFn<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

pub struct UseFetch<A, T> {
    fetch_fn: FetchFn<A, T>,
    state: watch::Sender<RequestState<T>>,
    deps: Mutex<A>,
    generation: AtomicU64,
    lazy: bool,
}

impl<A, T> UseFetch<A, T>
where
    A: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(fetch_fn: FetchFn<A, T>, deps: A) -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self {
            fetch_fn,
            state,
            deps: Mutex::new(deps),
            generation: AtomicU64::new(0),
            lazy: false,
        }
    }

    /// Seeds `data` before the first request completes.
    pub fn with_initial_data(self, data: T) -> Self {
        self.state.send_modify(|s| s.data = Some(data));
        self
    }

    /// Skips the request on [`mount`](Self::mount); the caller triggers it.
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Runs the initial request unless the hook is lazy.
    ///
    /// Failures are recorded in state only.
    pub async fn mount(&self) {
        if self.lazy {
            return;
        }
        let _ = self.refetch().await;
    }

    /// Stores new dependencies and re-runs the request if they changed.
    ///
    /// Returns `true` when a request was dispatched.
    pub async fn set_deps(&self, deps: A) -> bool {
        {
            let mut current = self.deps.lock().unwrap_or_else(|e| e.into_inner());
            if *current == deps {
                return false;
            }
            *current = deps.clone();
        }
        let _ = self.execute(deps).await;
        true
    }

    /// Re-runs the request with the current dependencies.
    pub async fn refetch(&self) -> Result<T, ApiError> {
        let deps = self.deps.lock().unwrap_or_else(|e| e.into_inner()).clone();
        self.execute(deps).await
    }

    /// Runs the request with explicit arguments.
    pub async fn execute(&self, args: A) -> Result<T, ApiError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = (self.fetch_fn)(args).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale response");
            return result;
        }

        match &result {
            Ok(data) => self.state.send_modify(|s| {
                s.data = Some(data.clone());
                s.loading = false;
                s.error = None;
            }),
            Err(e) => {
                let message = e.display_message();
                warn!(error = %message, "Fetch failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
            }
        }
        result
    }

    /// Overwrites `data` without a network call.
    pub fn mutate(&self, data: T) {
        self.state.send_modify(|s| s.data = Some(data));
    }

    pub fn snapshot(&self) -> RequestState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.state.subscribe()
    }
}
