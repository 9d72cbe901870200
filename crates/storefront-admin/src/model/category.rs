use super::{empty_as_none, slugify, CategoryId};
use admin_framework::Resource;
use serde::{Deserialize, Serialize};

/// A product or blog category. Categories nest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Resource for Category {
    type Id = CategoryId;
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    const PATH: &'static str = "categories";

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    pub description: Option<String>,
}

impl CategoryCreate {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            name,
            parent_id: None,
            description: None,
        }
    }

    /// Sets the parent from raw form input; blank means a root category.
    pub fn with_parent_input(
        mut self,
        input: &str,
    ) -> Result<Self, std::num::ParseIntError> {
        self.parent_id = CategoryId::parse_optional(input)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<CategoryId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_parent_input_is_submitted_as_null() {
        let create = CategoryCreate::new("Running Shoes")
            .with_parent_input("")
            .unwrap();
        let body = serde_json::to_value(&create).unwrap();
        assert_eq!(body["parentId"], json!(null));
        assert_eq!(body["slug"], "running-shoes");

        let create = CategoryCreate::new("Trail").with_parent_input("3").unwrap();
        assert_eq!(create.parent_id, Some(CategoryId(3)));
    }

    #[test]
    fn test_blank_parent_in_response_is_root() {
        let category: Category = serde_json::from_value(json!({
            "id": 5, "name": "Shoes", "slug": "shoes", "parentId": ""
        }))
        .unwrap();
        assert!(category.is_root());
    }
}
