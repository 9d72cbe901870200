//! # Mocks & Testing Guide
//!
//! Two layers can be faked, depending on what a test is about.
//!
//! | Layer | Fake | Use it to test |
//! |-------|------|----------------|
//! | Remote API | [`MockResourceApi`], [`MockAuthApi`] | stores, hooks and the session manager with scripted server answers |
//! | Store | [`create_mock_client`] + `expect_*` helpers | domain wrappers around a [`CrudClient`], without running a store |
//!
//! ## Scripted API
//!
//! Expectations are consumed in order. A call that does not match the next
//! expectation panics, and [`MockResourceApi::verify`] panics if any
//! expectation was left unused.
//!
//! ```rust,ignore
//! let api = Arc::new(MockResourceApi::<Tag>::new());
//! api.expect_list().return_ok(ListPage::new(vec![sale.clone()]));
//! api.expect_delete(sale.id).return_err(ApiError::Status { status: 409, body: None });
//!
//! let (actor, client) = CrudActor::new(8);
//! tokio::spawn(actor.run(api.clone()));
//! client.fetch_all(ListQuery::new()).await?;
//! assert!(client.remove(sale.id).await.is_err());
//! api.verify();
//! ```
//!
//! ## Raw store channel
//!
//! ```rust,ignore
//! let (client, mut rx) = create_mock_client::<Product>(8);
//! let products = ProductClient::new(client);
//! let task = tokio::spawn(async move { products.adjust_stock(id, 5).await });
//!
//! let (id, update, respond_to) = expect_update(&mut rx).await.unwrap();
//! respond_to.send(Ok(product_with_stock(5))).unwrap();
//! ```

use crate::actor::CrudCollection;
use crate::client::CrudClient;
use crate::envelope::ListPage;
use crate::error::{ApiError, FrameworkError};
use crate::message::CrudRequest;
use crate::resource::{ListQuery, Resource, ResourceApi};
use crate::session::{AuthApi, Credentials};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, watch};

type Queue<E> = Arc<Mutex<VecDeque<E>>>;

fn lock<E>(queue: &Mutex<VecDeque<E>>) -> std::sync::MutexGuard<'_, VecDeque<E>> {
    queue.lock().unwrap_or_else(|e| e.into_inner())
}

/// Builder returned by every `expect_*` method.
pub struct ExpectationBuilder<E, R> {
    queue: Queue<E>,
    wrap: Box<dyn FnOnce(Result<R, ApiError>) -> E + Send>,
}

impl<E, R> ExpectationBuilder<E, R> {
    fn new(queue: Queue<E>, wrap: impl FnOnce(Result<R, ApiError>) -> E + Send + 'static) -> Self {
        Self {
            queue,
            wrap: Box::new(wrap),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, ApiError>) {
        let expectation = (self.wrap)(response);
        lock(&self.queue).push_back(expectation);
    }
}

// =============================================================================
// RESOURCE API
// =============================================================================

/// An expected call to a [`MockResourceApi`].
pub enum ResourceExpectation<T: Resource> {
    List(Result<ListPage<T>, ApiError>),
    Get(T::Id, Result<T, ApiError>),
    Create(Result<T, ApiError>),
    Update(T::Id, Result<Value, ApiError>),
    Delete(T::Id, Result<(), ApiError>),
}

pub struct MockResourceApi<T: Resource> {
    expectations: Queue<ResourceExpectation<T>>,
    queries: Mutex<Vec<ListQuery>>,
}

impl<T: Resource> Default for MockResourceApi<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MockResourceApi<T> {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn expect_list(&self) -> ExpectationBuilder<ResourceExpectation<T>, ListPage<T>> {
        ExpectationBuilder::new(self.expectations.clone(), ResourceExpectation::List)
    }

    pub fn expect_get(&self, id: T::Id) -> ExpectationBuilder<ResourceExpectation<T>, T> {
        ExpectationBuilder::new(self.expectations.clone(), move |r| ResourceExpectation::Get(id, r))
    }

    pub fn expect_create(&self) -> ExpectationBuilder<ResourceExpectation<T>, T> {
        ExpectationBuilder::new(self.expectations.clone(), ResourceExpectation::Create)
    }

    /// The response is the JSON the server sends back, usually a subset of fields.
    pub fn expect_update(&self, id: T::Id) -> ExpectationBuilder<ResourceExpectation<T>, Value> {
        ExpectationBuilder::new(self.expectations.clone(), move |r| {
            ResourceExpectation::Update(id, r)
        })
    }

    pub fn expect_delete(&self, id: T::Id) -> ExpectationBuilder<ResourceExpectation<T>, ()> {
        ExpectationBuilder::new(self.expectations.clone(), move |r| {
            ResourceExpectation::Delete(id, r)
        })
    }

    /// Queries received by `list`, in call order.
    pub fn received_queries(&self) -> Vec<ListQuery> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn next(&self, call: &str) -> ResourceExpectation<T> {
        match lock(&self.expectations).pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {} call on {}", call, T::PATH),
        }
    }
}

fn check_id<I: PartialEq + std::fmt::Debug>(call: &str, expected: &I, actual: &I) {
    if expected != actual {
        panic!("{} called with id {:?}, expected {:?}", call, actual, expected);
    }
}

#[async_trait]
impl<T: Resource> ResourceApi<T> for MockResourceApi<T> {
    async fn list(&self, query: &ListQuery) -> Result<ListPage<T>, ApiError> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.clone());
        match self.next("list") {
            ResourceExpectation::List(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: list"),
        }
    }

    async fn get(&self, id: &T::Id) -> Result<T, ApiError> {
        match self.next("get") {
            ResourceExpectation::Get(expected, response) => {
                check_id("get", &expected, id);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: get"),
        }
    }

    async fn create(&self, _params: &T::Create) -> Result<T, ApiError> {
        match self.next("create") {
            ResourceExpectation::Create(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: create"),
        }
    }

    async fn update(&self, id: &T::Id, _update: &T::Update) -> Result<Value, ApiError> {
        match self.next("update") {
            ResourceExpectation::Update(expected, response) => {
                check_id("update", &expected, id);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: update"),
        }
    }

    async fn delete(&self, id: &T::Id) -> Result<(), ApiError> {
        match self.next("delete") {
            ResourceExpectation::Delete(expected, response) => {
                check_id("delete", &expected, id);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: delete"),
        }
    }
}

// =============================================================================
// AUTH API
// =============================================================================

/// An expected call to a [`MockAuthApi`].
pub enum AuthExpectation<U> {
    CurrentUser(Result<U, ApiError>),
    Login(Result<U, ApiError>),
    Logout(Result<(), ApiError>),
    SwitchRole(String, Result<U, ApiError>),
}

pub struct MockAuthApi<U> {
    expectations: Queue<AuthExpectation<U>>,
}

impl<U: Send + 'static> Default for MockAuthApi<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Send + 'static> MockAuthApi<U> {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn expect_current_user(&self) -> ExpectationBuilder<AuthExpectation<U>, U> {
        ExpectationBuilder::new(self.expectations.clone(), AuthExpectation::CurrentUser)
    }

    pub fn expect_login(&self) -> ExpectationBuilder<AuthExpectation<U>, U> {
        ExpectationBuilder::new(self.expectations.clone(), AuthExpectation::Login)
    }

    pub fn expect_logout(&self) -> ExpectationBuilder<AuthExpectation<U>, ()> {
        ExpectationBuilder::new(self.expectations.clone(), AuthExpectation::Logout)
    }

    pub fn expect_switch_role(
        &self,
        role: impl Into<String>,
    ) -> ExpectationBuilder<AuthExpectation<U>, U> {
        let role = role.into();
        ExpectationBuilder::new(self.expectations.clone(), move |r| {
            AuthExpectation::SwitchRole(role, r)
        })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn next(&self, call: &str) -> AuthExpectation<U> {
        match lock(&self.expectations).pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected auth call: {}", call),
        }
    }
}

#[async_trait]
impl<U: Send + Sync + 'static> AuthApi<U> for MockAuthApi<U> {
    async fn current_user(&self) -> Result<U, ApiError> {
        match self.next("current_user") {
            AuthExpectation::CurrentUser(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: current_user"),
        }
    }

    async fn login(&self, _credentials: &Credentials) -> Result<U, ApiError> {
        match self.next("login") {
            AuthExpectation::Login(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: login"),
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        match self.next("logout") {
            AuthExpectation::Logout(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: logout"),
        }
    }

    async fn switch_role(&self, role: &str) -> Result<U, ApiError> {
        match self.next("switch_role") {
            AuthExpectation::SwitchRole(expected, response) => {
                check_id("switch_role", &expected.as_str(), &role);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: switch_role"),
        }
    }
}

// =============================================================================
// RAW STORE CHANNEL
// =============================================================================

/// Responder half handed back by the `expect_*` helpers.
pub type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a store client whose requests land on the returned receiver
/// instead of a running [`CrudActor`](crate::CrudActor).
///
/// The client's published collection stays at its default.
pub fn create_mock_client<T: Resource>(
    buffer_size: usize,
) -> (CrudClient<T>, mpsc::Receiver<CrudRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_state, state_rx) = watch::channel(CrudCollection::default());
    (CrudClient::new(sender, state_rx), receiver)
}

/// Helper to verify that the next message is a FetchAll request
pub async fn expect_fetch_all<T: Resource>(
    receiver: &mut mpsc::Receiver<CrudRequest<T>>,
) -> Option<(ListQuery, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(CrudRequest::FetchAll { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Resource>(
    receiver: &mut mpsc::Receiver<CrudRequest<T>>,
) -> Option<(T::Id, Responder<T>)> {
    match receiver.recv().await {
        Some(CrudRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Resource>(
    receiver: &mut mpsc::Receiver<CrudRequest<T>>,
) -> Option<(T::Create, Responder<T>)> {
    match receiver.recv().await {
        Some(CrudRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Resource>(
    receiver: &mut mpsc::Receiver<CrudRequest<T>>,
) -> Option<(T::Id, T::Update, Responder<T>)> {
    match receiver.recv().await {
        Some(CrudRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Remove request
pub async fn expect_remove<T: Resource>(
    receiver: &mut mpsc::Receiver<CrudRequest<T>>,
) -> Option<(T::Id, Responder<()>)> {
    match receiver.recv().await {
        Some(CrudRequest::Remove { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        id: u32,
        name: String,
    }

    impl Resource for Tag {
        type Id = u32;
        type Create = String;
        type Update = String;
        const PATH: &'static str = "tags";

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    #[tokio::test]
    async fn test_expectations_consumed_in_order() {
        let api = MockResourceApi::<Tag>::new();
        api.expect_get(1).return_ok(Tag { id: 1, name: "sale".into() });
        api.expect_delete(1).return_err(ApiError::Status { status: 409, body: None });

        assert_eq!(api.get(&1).await.unwrap().name, "sale");
        assert_eq!(api.delete(&1).await.unwrap_err().status(), Some(409));
        api.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_leftovers() {
        let api = MockResourceApi::<Tag>::new();
        api.expect_list().return_ok(ListPage::default());
        api.verify();
    }

    #[tokio::test]
    async fn test_list_queries_are_recorded() {
        let api = MockResourceApi::<Tag>::new();
        api.expect_list().return_ok(ListPage::default());
        api.list(&ListQuery::new().search("sa")).await.unwrap();
        assert_eq!(api.received_queries()[0].search.as_deref(), Some("sa"));
    }

    #[tokio::test]
    async fn test_mock_client_channel() {
        let (client, mut rx) = create_mock_client::<Tag>(4);
        let task = tokio::spawn(async move { client.create("new".to_string()).await });

        let (params, respond_to) = expect_create(&mut rx).await.unwrap();
        assert_eq!(params, "new");
        respond_to.send(Ok(Tag { id: 9, name: params })).unwrap();

        assert_eq!(task.await.unwrap().unwrap().id, 9);
    }
}
