//! # Resource Trait
//!
//! A [`Resource`] is a backend collection with the standard list / get /
//! create / update / delete endpoints (products, tags, orders, ...).
//!
//! Associated types keep payloads apart at compile time: a `Product` store
//! only accepts `ProductCreate`, never a `TagCreate`.
//!
//! [`ResourceApi`] is the seam to the remote API. The storefront crate
//! implements it over HTTP; tests use [`crate::mock::MockResourceApi`].

use crate::envelope::ListPage;
use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

/// Trait that any backend record must implement to be mirrored by a
/// [`CrudActor`](crate::CrudActor).
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The unique identifier. `Display` must render the value used in URLs.
    type Id: Clone + Eq + Display + Debug + Send + Sync + 'static;

    /// Payload for creating a new record.
    type Create: Serialize + Debug + Send + Sync + 'static;

    /// Payload for updating an existing record.
    type Update: Serialize + Debug + Send + Sync + 'static;

    /// Collection path relative to the API base, e.g. `products`.
    const PATH: &'static str;

    fn id(&self) -> &Self::Id;
}

/// The remote endpoints of one resource.
///
/// Implementations normalize response envelopes before returning, see
/// [`crate::envelope`].
#[async_trait]
pub trait ResourceApi<T: Resource>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<ListPage<T>, ApiError>;

    async fn get(&self, id: &T::Id) -> Result<T, ApiError>;

    async fn create(&self, params: &T::Create) -> Result<T, ApiError>;

    /// Returns the fields the server sent back, which may be a subset of
    /// the record. Stores merge them into their local copy.
    async fn update(&self, id: &T::Id, update: &T::Update) -> Result<Value, ApiError>;

    async fn delete(&self, id: &T::Id) -> Result<(), ApiError>;
}

/// Query string parameters for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Flattens the query into `key=value` pairs, skipping unset fields.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

/// Shallow-merges `fields` over `item`, the way `{...item, ...fields}` would.
///
/// Keys present in `fields` replace the item's keys; everything else is
/// kept. A non-object `fields` leaves the item unchanged.
pub fn merge_fields<T: Resource>(item: &T, fields: &Value) -> Result<T, ApiError> {
    let Value::Object(patch) = fields else {
        return Ok(item.clone());
    };
    let mut base = serde_json::to_value(item).map_err(ApiError::decode)?;
    if let Value::Object(map) = &mut base {
        for (key, value) in patch {
            map.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(base).map_err(ApiError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        id: u32,
        name: String,
        slug: String,
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

    #[test]
    fn test_merge_replaces_only_returned_keys() {
        let tag = Tag { id: 1, name: "Sale".into(), slug: "sale".into() };
        let merged = merge_fields(&tag, &json!({ "name": "Clearance" })).unwrap();
        assert_eq!(merged, Tag { id: 1, name: "Clearance".into(), slug: "sale".into() });
    }

    #[test]
    fn test_merge_ignores_non_object() {
        let tag = Tag { id: 1, name: "Sale".into(), slug: "sale".into() };
        assert_eq!(merge_fields(&tag, &Value::Null).unwrap(), tag);
    }

    #[test]
    fn test_merge_rejects_mistyped_fields() {
        let tag = Tag { id: 1, name: "Sale".into(), slug: "sale".into() };
        let err = merge_fields(&tag, &json!({ "name": 42 })).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_query_pairs() {
        let query = ListQuery::new()
            .page(2, 20)
            .search("shoe")
            .filter("status", "active");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("search".to_string(), "shoe".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );
        assert!(ListQuery::new().to_pairs().is_empty());
    }
}
