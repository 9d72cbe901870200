use admin_framework::mock::{MockAuthApi, MockResourceApi};
use admin_framework::{
    ApiError, CrudActor, Credentials, FrameworkError, ListPage, ListQuery, Resource,
    SessionManager,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

// --- Test Resource ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Tag {
    id: u32,
    name: String,
    slug: String,
}

#[derive(Debug, Serialize)]
struct TagCreate {
    name: String,
}

#[derive(Debug, Serialize)]
struct TagUpdate {
    name: Option<String>,
}

impl Resource for Tag {
    type Id = u32;
    type Create = TagCreate;
    type Update = TagUpdate;
    const PATH: &'static str = "tags";

    fn id(&self) -> &u32 {
        &self.id
    }
}

fn tag(id: u32, name: &str) -> Tag {
    Tag {
        id,
        name: name.into(),
        slug: name.to_lowercase(),
    }
}

fn ids(items: &[Tag]) -> Vec<u32> {
    items.iter().map(|t| t.id).collect()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct SessionUser {
    id: u64,
    role: String,
}

// --- CRUD store ---

#[tokio::test]
async fn test_crud_store_full_lifecycle() {
    let api = Arc::new(MockResourceApi::<Tag>::new());
    api.expect_list()
        .return_ok(ListPage::new(vec![tag(2, "B"), tag(3, "C")]).with_total(2));
    api.expect_create().return_ok(tag(1, "A"));
    api.expect_update(3).return_ok(json!({ "name": "X" }));
    api.expect_delete(2).return_ok(());

    let (actor, client) = CrudActor::<Tag>::new(10);
    let handle = tokio::spawn(actor.run(api.clone()));

    // 1. Fetch replaces the list
    client.fetch_all(ListQuery::new()).await.unwrap();
    assert_eq!(ids(&client.items()), vec![2, 3]);

    // 2. Create prepends
    let created = client
        .create(TagCreate { name: "A".into() })
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(ids(&client.items()), vec![1, 2, 3]);

    // 3. Update merges returned fields into the matching item only
    let updated = client
        .update(3, TagUpdate { name: Some("X".into()) })
        .await
        .unwrap();
    assert_eq!(updated, Tag { id: 3, name: "X".into(), slug: "c".into() });
    let items = client.items();
    assert_eq!(ids(&items), vec![1, 2, 3]);
    assert_eq!(items[0], tag(1, "A"));
    assert_eq!(items[1], tag(2, "B"));

    // 4. Remove drops exactly one item
    client.remove(2).await.unwrap();
    let snapshot = client.snapshot();
    assert_eq!(ids(&snapshot.items), vec![1, 3]);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);

    api.verify();
    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_failed_mutation_leaves_list_unchanged() {
    let api = Arc::new(MockResourceApi::<Tag>::new());
    api.expect_list()
        .return_ok(ListPage::new(vec![tag(2, "B"), tag(3, "C")]));
    api.expect_create().return_err(ApiError::Status {
        status: 422,
        body: Some(json!({ "error": { "message": "Name already taken" } })),
    });
    api.expect_delete(3).return_err(ApiError::Transport("timed out".into()));

    let (actor, client) = CrudActor::<Tag>::new(10);
    tokio::spawn(actor.run(api.clone()));
    client.fetch_all(ListQuery::new()).await.unwrap();

    let err = client
        .create(TagCreate { name: "B".into() })
        .await
        .unwrap_err();
    assert_eq!(err.display_message(), "Name already taken");
    assert_eq!(ids(&client.items()), vec![2, 3]);
    assert_eq!(client.snapshot().error.as_deref(), Some("Name already taken"));

    let err = client.remove(3).await.unwrap_err();
    assert_eq!(err.api_error().and_then(ApiError::status), None);
    let snapshot = client.snapshot();
    assert_eq!(ids(&snapshot.items), vec![2, 3]);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error.as_deref(), Some("Network error: timed out"));

    api.verify();
}

#[tokio::test]
async fn test_update_of_unlisted_record_keeps_list() {
    let api = Arc::new(MockResourceApi::<Tag>::new());
    api.expect_update(9)
        .return_ok(json!({ "id": 9, "name": "Z", "slug": "z" }));
    api.expect_update(9).return_ok(json!({ "name": "Y" }));
    api.expect_get(9).return_ok(tag(9, "Y"));

    let (actor, client) = CrudActor::<Tag>::new(10);
    tokio::spawn(actor.run(api.clone()));

    let updated = client
        .update(9, TagUpdate { name: Some("Z".into()) })
        .await
        .unwrap();
    assert_eq!(updated, tag(9, "Z"));
    assert!(client.items().is_empty());

    // Partial fields with no local copy: the record is loaded instead.
    let updated = client
        .update(9, TagUpdate { name: Some("Y".into()) })
        .await
        .unwrap();
    assert_eq!(updated, tag(9, "Y"));
    let snapshot = client.snapshot();
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.error, None);
    assert!(!snapshot.loading);
    api.verify();
}

#[tokio::test]
async fn test_store_closed_after_actor_stops() {
    let (actor, client) = CrudActor::<Tag>::new(1);
    drop(actor);
    let err = client.fetch_all(ListQuery::new()).await.unwrap_err();
    assert!(matches!(err, FrameworkError::StoreClosed));
}

// --- Session ---

#[tokio::test]
async fn test_boot_401_then_login() {
    let api = Arc::new(MockAuthApi::<SessionUser>::new());
    api.expect_current_user()
        .return_err(ApiError::Status { status: 401, body: None });
    api.expect_login().return_ok(SessionUser { id: 1, role: "admin".into() });

    let session = SessionManager::new(api.clone());
    session.init().await;
    let state = session.session();
    assert!(!state.is_authenticated);
    assert_eq!(state.error, None);
    assert!(state.initialized);

    let outcome = session
        .login(Credentials::new("ada@example.com", "secret"))
        .await;
    assert!(outcome.success);
    let state = session.session();
    assert!(state.is_authenticated);
    assert_eq!(state.user.map(|u| u.id), Some(1));
    api.verify();
}

#[tokio::test]
async fn test_check_auth_surfaces_non_401_errors() {
    let api = Arc::new(MockAuthApi::<SessionUser>::new());
    api.expect_current_user().return_err(ApiError::Status {
        status: 500,
        body: Some(json!({ "message": "Database unavailable" })),
    });

    let session = SessionManager::new(api);
    session.check_auth().await;
    let state = session.session();
    assert!(!state.is_authenticated);
    assert!(state.initialized);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));

    session.clear_error();
    assert_eq!(session.session().error, None);
}

#[tokio::test]
async fn test_login_failure_returns_outcome() {
    let api = Arc::new(MockAuthApi::<SessionUser>::new());
    api.expect_login()
        .return_err(ApiError::Rejected("Invalid email or password".into()));

    let session = SessionManager::new(api);
    let outcome = session.login(Credentials::new("x@example.com", "nope")).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Invalid email or password"));
    assert_eq!(
        session.session().error.as_deref(),
        Some("Invalid email or password")
    );
}

#[tokio::test]
async fn test_switch_role_and_logout() {
    let api = Arc::new(MockAuthApi::<SessionUser>::new());
    api.expect_current_user()
        .return_ok(SessionUser { id: 4, role: "customer".into() });
    api.expect_switch_role("vendor")
        .return_err(ApiError::Status { status: 403, body: None });
    api.expect_switch_role("admin")
        .return_ok(SessionUser { id: 4, role: "admin".into() });
    api.expect_logout()
        .return_err(ApiError::Transport("connection refused".into()));

    let session = SessionManager::new(api.clone());
    let mut rx = session.subscribe();
    session.init().await;
    assert!(rx.has_changed().unwrap());

    let outcome = session.switch_role("vendor").await;
    assert!(!outcome.success);
    let state = session.session();
    assert_eq!(state.user.as_ref().map(|u| u.role.as_str()), Some("customer"));
    assert_eq!(state.error.as_deref(), Some("Request failed with status code 403"));

    assert!(session.switch_role("admin").await.success);
    assert_eq!(session.session().user.map(|u| u.role), Some("admin".to_string()));

    // Remote failure is ignored; local state still resets.
    session.logout().await;
    let state = session.session();
    assert!(!state.is_authenticated);
    assert_eq!(state.user, None);
    assert!(state.initialized);

    session.dispose();
    assert!(!session.session().initialized);
    api.verify();
}
