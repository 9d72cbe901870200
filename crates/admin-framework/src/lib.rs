//! # Admin Framework
//!
//! Generic client-side building blocks for back-office screens that talk to
//! a REST backend. Every "hook" here is an explicit state container whose
//! state is published on a [`tokio::sync::watch`] channel: a watch update is
//! what a view re-renders on.
//!
//! ## Building Blocks
//!
//! | Type | What it tracks |
//! |------|----------------|
//! | [`UseFetch`] | one async call: `data` / `loading` / `error` |
//! | [`UsePaginatedFetch`] | a paged list plus page / limit / total bookkeeping |
//! | [`CrudActor`] + [`CrudClient`] | a local mirror of a remote collection |
//! | [`DebouncedSearch`] | a query string and its debounced remote results |
//! | [`UseUpload`] | one multipart upload and its progress |
//! | [`SessionManager`] | the logged-in user, shared app-wide |
//!
//! ## Layers
//!
//! 1. **Remote layer** ([`ResourceApi`], [`AuthApi`]) - the backend's endpoints.
//!    Implementations normalize response envelopes through [`envelope`], so
//!    nothing above this layer ever sees more than one response shape.
//! 2. **State layer** (the hooks above) - request lifecycle, merging
//!    server answers into local state, error normalization.
//! 3. **Domain layer** ([`ResourceHandle`]) - typed wrappers per resource,
//!    living in the application crate.
//!
//! ## Errors
//!
//! Failures are reduced to a display string once, by
//! [`ApiError::display_message`], and stored in the hook's `error` field.
//! The hooks also return the error so callers can react (show an alert,
//! keep a form open). The session manager is the exception: it reports
//! failures through [`AuthOutcome`] and never returns `Err`.
//!
//! ## Ordering
//!
//! [`UseFetch`] and [`UsePaginatedFetch`] stamp every dispatch with a
//! generation number. If two requests race, only the one dispatched last
//! may write state. CRUD stores process their requests one at a time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use admin_framework::{CrudActor, ListQuery};
//!
//! let (actor, tags) = CrudActor::<Tag>::new(32);
//! let handle = tokio::spawn(actor.run(api));
//!
//! tags.fetch_all(ListQuery::new()).await?;
//! let created = tags.create(TagCreate::new("Sale")).await?;
//! assert_eq!(tags.items()[0], created);
//!
//! drop(tags);
//! handle.await?;
//! ```

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod message;
pub mod mock;
pub mod paginate;
pub mod resource;
pub mod search;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod upload;

// Re-export core types for convenience
pub use actor::{CrudActor, CrudCollection};
pub use client::CrudClient;
pub use client_trait::ResourceHandle;
pub use envelope::ListPage;
pub use error::{ApiError, FrameworkError, GENERIC_ERROR_MESSAGE};
pub use fetch::{FetchFn, UseFetch};
pub use message::{CrudRequest, Response};
pub use paginate::{list_fetcher, PageFetchFn, PagedState, UsePaginatedFetch};
pub use resource::{merge_fields, ListQuery, Resource, ResourceApi};
pub use search::{search_via_list, DebouncedSearch, SearchFn, SearchState, DEFAULT_DEBOUNCE};
pub use session::{
    reduce, AuthAction, AuthApi, AuthOutcome, AuthSession, Credentials, SessionManager,
};
pub use state::{total_pages_for, PageQuery, PaginationState, RequestState};
pub use upload::{
    MultipartPayload, ProgressEvent, ProgressFn, UploadFile, UploadFn, UploadState, UseUpload,
};
