use admin_framework::{ListQuery, ResourceHandle};
use serde_json::json;
use std::time::Duration;
use storefront_admin::config::AdminConfig;
use storefront_admin::lifecycle::AdminSystem;
use storefront_admin::model::{ProductCreate, ProductId, TagCreate, TagId};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product(id: u64, name: &str, stock: i64) -> serde_json::Value {
    json!({ "id": id, "name": name, "slug": name.to_lowercase(), "price": 20.0, "stock": stock })
}

async fn start() -> (MockServer, AdminSystem) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 1, "name": "Ada", "email": "ada@example.com", "role": "admin" }
        })))
        .mount(&server)
        .await;

    let mut config = AdminConfig::default().with_api_url(format!("{}/api", server.uri()));
    config.page_size = 2;
    config.search_debounce_ms = 20;

    let system = AdminSystem::new(config).unwrap();
    system.init().await;
    (server, system)
}

#[tokio::test]
async fn test_store_mirrors_remote_collection() {
    let (server, system) = start().await;
    assert!(system.session.is_authenticated());

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [product(2, "Tee", 4), product(3, "Sock", 9)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "data": product(4, "Cap", 0) })),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/products/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stock": 6 })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/products/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    system.products.fetch_all(ListQuery::new()).await.unwrap();
    system
        .products
        .create_product(ProductCreate::new("Cap", 20.0))
        .await
        .unwrap();
    let ids: Vec<_> = system.products.items().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId(4), ProductId(2), ProductId(3)]);

    // Served from the local copy, then merged with the returned fields.
    let updated = system.products.adjust_stock(ProductId(3), -3).await.unwrap();
    assert_eq!(updated.stock, 6);
    assert_eq!(updated.name, "Sock");

    system.products.remove(ProductId(2)).await.unwrap();
    let items = system.products.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].stock, 6);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_create_keeps_list_and_records_error() {
    let (server, system) = start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Sale", "slug": "sale" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Slug already taken" })),
        )
        .mount(&server)
        .await;

    system.tags.fetch_all(ListQuery::new()).await.unwrap();
    let err = system.tags.create(TagCreate::new("Sale")).await.unwrap_err();
    assert_eq!(err.display_message(), "Slug already taken");

    let snapshot = system.tags.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].id, TagId(1));
    assert_eq!(snapshot.error.as_deref(), Some("Slug already taken"));
    assert!(!snapshot.loading);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_product_table_pages() {
    let (server, system) = start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [product(1, "A", 1), product(2, "B", 1)],
            "total": 5
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [product(5, "E", 1)],
            "total": 5
        })))
        .mount(&server)
        .await;

    let table = system.product_table();
    table.fetch().await.unwrap();
    let state = table.snapshot();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.pagination.total, 5);
    assert_eq!(state.pagination.total_pages, 3);
    assert!(state.pagination.has_next());

    assert!(table.go_to_page(3).await);
    let state = table.snapshot();
    assert_eq!(state.items[0].id, ProductId(5));
    assert!(!state.pagination.has_next());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_product_search_is_debounced() {
    let (server, system) = start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("search", "cap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(4, "Cap", 2)])))
        .expect(1)
        .mount(&server)
        .await;

    let search = system.product_search();
    let mut rx = search.subscribe();
    search.set_query("c");
    search.set_query("ca");
    search.set_query("cap");

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            if !state.searching && !state.results.is_empty() {
                break;
            }
        }
    })
    .await
    .expect("search did not complete");

    let state = search.snapshot();
    assert_eq!(state.query, "cap");
    assert_eq!(state.results[0].name, "Cap");

    drop(search);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_settings_hook_loads_on_mount() {
    let (server, system) = start().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "siteName": "Trailhead" })))
        .mount(&server)
        .await;

    let settings = system.settings();
    settings.mount().await;
    let state = settings.snapshot();
    assert!(!state.loading);
    assert_eq!(state.data.unwrap().currency, "USD");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_logs_session_out_locally() {
    let (_server, system) = start().await;
    let session = system.session.clone();
    assert!(session.is_authenticated());

    system.shutdown().await.unwrap();
    assert!(!session.is_authenticated());
    assert!(!session.session().initialized);
}
