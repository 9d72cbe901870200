use super::SessionWatchdog;
use crate::api::{upload_fn, ApiClient, HttpAuthApi, HttpResource, SettingsApi, UploadedFile};
use crate::clients::{
    BrandStore, CategoryStore, OrderClient, PostClient, ProductClient, TagStore, UserClient,
};
use crate::config::AdminConfig;
use crate::model::{Product, SiteSettings, User};
use admin_framework::{
    list_fetcher, search_via_list, ApiError, CrudActor, CrudClient, DebouncedSearch, FetchFn,
    ListQuery, PageQuery, Resource, ResourceApi, SessionManager, UseFetch, UsePaginatedFetch,
    UseUpload,
};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Pending requests each store queues before senders wait.
const STORE_BUFFER: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Failed to build API client: {0}")]
    Api(#[from] ApiError),
    #[error("Store task failed: {0}")]
    TaskFailed(String),
}

/// Everything the back office runs on.
///
/// `new` builds the HTTP client, the session manager and one CRUD store
/// per resource, each store in its own task. Screens get their hooks from
/// the factory methods. `shutdown` closes every store and waits for it.
///
/// ```ignore
/// let system = AdminSystem::new(AdminConfig::from_env())?;
/// system.init().await;
///
/// let table = system.product_table();
/// table.fetch().await?;
///
/// system.shutdown().await?;
/// ```
pub struct AdminSystem {
    pub config: AdminConfig,
    pub session: Arc<SessionManager<User>>,
    pub products: ProductClient,
    pub posts: PostClient,
    pub orders: OrderClient,
    pub users: UserClient,
    pub brands: BrandStore,
    pub categories: CategoryStore,
    pub tags: TagStore,
    api: ApiClient,
    product_api: Arc<dyn ResourceApi<Product>>,
    watchdog: SessionWatchdog,
    handles: Vec<JoinHandle<()>>,
}

fn spawn_store<T: Resource>(
    api: Arc<dyn ResourceApi<T>>,
    handles: &mut Vec<JoinHandle<()>>,
) -> CrudClient<T> {
    let (actor, client) = CrudActor::<T>::new(STORE_BUFFER);
    handles.push(tokio::spawn(actor.run(api)));
    client
}

fn http_store<T: Resource>(api: &ApiClient, handles: &mut Vec<JoinHandle<()>>) -> CrudClient<T> {
    spawn_store(Arc::new(HttpResource::<T>::new(api.clone())), handles)
}

impl AdminSystem {
    /// Must be called inside a Tokio runtime.
    pub fn new(config: AdminConfig) -> Result<Self, SystemError> {
        let api = ApiClient::new(&config)?;
        let session = Arc::new(SessionManager::new(Arc::new(HttpAuthApi::new(api.clone()))));

        let mut handles = Vec::new();
        let product_api: Arc<dyn ResourceApi<Product>> =
            Arc::new(HttpResource::<Product>::new(api.clone()));
        let products = ProductClient::new(spawn_store(product_api.clone(), &mut handles));
        let posts = PostClient::new(http_store(&api, &mut handles));
        let orders = OrderClient::new(http_store(&api, &mut handles));
        let users = UserClient::new(http_store(&api, &mut handles));
        let brands = http_store(&api, &mut handles);
        let categories = http_store(&api, &mut handles);
        let tags = http_store(&api, &mut handles);

        let watchdog = SessionWatchdog::spawn(
            session.clone(),
            config.session_timeout(),
            watchdog_interval(config.session_timeout()),
        );

        info!(api_url = %config.api_url, stores = handles.len(), "Admin system started");
        Ok(Self {
            config,
            session,
            products,
            posts,
            orders,
            users,
            brands,
            categories,
            tags,
            api,
            product_api,
            watchdog,
            handles,
        })
    }

    /// Runs the boot-time session check.
    pub async fn init(&self) {
        self.session.init().await;
    }

    /// Records user activity for the idle logout.
    pub fn touch(&self) {
        self.watchdog.touch();
    }

    /// Paged product table, filtered by a `ListQuery` of filters.
    pub fn product_table(&self) -> UsePaginatedFetch<ListQuery, Product> {
        UsePaginatedFetch::new(
            list_fetcher(self.product_api.clone()),
            PageQuery::new(1, self.config.page_size),
            ListQuery::new(),
        )
    }

    pub fn product_search(&self) -> DebouncedSearch<Product> {
        DebouncedSearch::with_delay(
            search_via_list(self.product_api.clone()),
            self.config.search_debounce(),
        )
    }

    pub fn settings_api(&self) -> SettingsApi {
        SettingsApi::new(self.api.clone())
    }

    /// Settings screen loader.
    pub fn settings(&self) -> UseFetch<(), SiteSettings> {
        let api = self.settings_api();
        let fetch: FetchFn<(), SiteSettings> = Arc::new(move |()| {
            let api = api.clone();
            async move { api.load().await }.boxed()
        });
        UseFetch::new(fetch, ())
    }

    pub fn uploader(&self) -> UseUpload<UploadedFile> {
        UseUpload::new(upload_fn(self.api.clone()))
    }

    /// Stops the watchdog, closes every store and waits for the store tasks.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down admin system...");
        self.watchdog.stop().await;

        drop(self.products);
        drop(self.posts);
        drop(self.orders);
        drop(self.users);
        drop(self.brands);
        drop(self.categories);
        drop(self.tags);

        let outcome = join_stores(self.handles).await;

        self.session.dispose();
        info!("Admin system shutdown complete.");
        outcome
    }
}

/// Waits for every store task and keeps the first failure.
async fn join_stores(handles: Vec<JoinHandle<()>>) -> Result<(), SystemError> {
    let mut outcome = Ok(());
    for handle in handles {
        if let Err(e) = handle.await {
            error!("Store task failed: {:?}", e);
            if outcome.is_ok() {
                outcome = Err(SystemError::TaskFailed(e.to_string()));
            }
        }
    }
    outcome
}

/// A tenth of the timeout, between one second and one minute.
fn watchdog_interval(timeout: Duration) -> Duration {
    (timeout / 10).clamp(Duration::from_secs(1), Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watchdog_interval_bounds() {
        assert_eq!(watchdog_interval(Duration::from_secs(1800)), Duration::from_secs(60));
        assert_eq!(watchdog_interval(Duration::from_secs(300)), Duration::from_secs(30));
        assert_eq!(watchdog_interval(Duration::from_secs(3)), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_join_stores_waits_for_all_after_failure() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let handles = vec![
            tokio::spawn(async { panic!("store crashed") }),
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                flag.store(true, Ordering::SeqCst);
            }),
        ];

        let err = join_stores(handles).await.unwrap_err();
        assert!(matches!(err, SystemError::TaskFailed(_)));
        assert!(finished.load(Ordering::SeqCst));
    }
}
