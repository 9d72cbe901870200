use super::{empty_as_none, slugify, BrandId, CategoryId, ProductId};
use admin_framework::Resource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub brand_id: Option<BrandId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Resource for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    const PATH: &'static str = "products";

    fn id(&self) -> &ProductId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub sku: Option<String>,
    pub stock: i64,
    pub status: ProductStatus,
    pub brand_id: Option<BrandId>,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
}

impl ProductCreate {
    /// A draft with no stock; the slug is derived from the name.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            name,
            description: None,
            price,
            sku: None,
            stock: 0,
            status: ProductStatus::Draft,
            brand_id: None,
            category_id: None,
            images: Vec::new(),
        }
    }
}

/// Partial update; unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<Option<BrandId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<CategoryId>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_sends_null_references() {
        let body = serde_json::to_value(ProductCreate::new("Trail Runner", 89.5)).unwrap();
        assert_eq!(body["slug"], "trail-runner");
        assert_eq!(body["brandId"], json!(null));
        assert_eq!(body["categoryId"], json!(null));
        assert_eq!(body["status"], "draft");
    }

    #[test]
    fn test_update_distinguishes_clear_from_keep() {
        let keep = ProductUpdate {
            price: Some(10.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(keep).unwrap(), json!({ "price": 10.0 }));

        let clear = ProductUpdate {
            brand_id: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(clear).unwrap(), json!({ "brandId": null }));
    }

    #[test]
    fn test_reads_blank_references() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Cap",
            "slug": "cap",
            "price": 12.0,
            "stock": 4,
            "status": "active",
            "brandId": "",
            "categoryId": 2
        }))
        .unwrap();
        assert_eq!(product.brand_id, None);
        assert_eq!(product.category_id, Some(CategoryId(2)));
        assert!(product.in_stock());
    }
}
