//! # Product Client
//!
//! Wraps the `Product` store with catalog operations.
use crate::model::{Product, ProductCreate, ProductId, ProductStatus, ProductUpdate};
use admin_framework::{CrudClient, FrameworkError, ResourceHandle};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProductError {
    #[error("{0}")]
    Store(String),
    #[error("Only {available} in stock for product {id}")]
    InsufficientStock { id: ProductId, available: i64 },
}

#[derive(Clone)]
pub struct ProductClient {
    inner: CrudClient<Product>,
}

impl ProductClient {
    pub fn new(inner: CrudClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Adds `delta` (negative to remove) to the stock level.
    ///
    /// Uses the local copy when the product is listed, otherwise loads it.
    /// Stock never goes below zero.
    #[instrument(skip(self))]
    pub async fn adjust_stock(&self, id: ProductId, delta: i64) -> Result<Product, ProductError> {
        let current = match self.inner.find(&id) {
            Some(product) => product,
            None => self.inner.get(id).await.map_err(Self::map_error)?,
        };

        let stock = current.stock + delta;
        if stock < 0 {
            warn!(available = current.stock, "Stock adjustment refused");
            return Err(ProductError::InsufficientStock {
                id,
                available: current.stock,
            });
        }

        debug!(from = current.stock, to = stock, "Adjusting stock");
        self.update_product(
            id,
            ProductUpdate {
                stock: Some(stock),
                ..Default::default()
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<Product, ProductError> {
        self.update_product(
            id,
            ProductUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }
}

#[async_trait]
impl ResourceHandle<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &CrudClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ProductError::Store(e.display_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_framework::mock::{create_mock_client, expect_get, expect_update};
    use admin_framework::ApiError;

    fn product(stock: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 7, "name": "Cap", "slug": "cap", "price": 12.0, "stock": stock
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_adjust_stock_loads_unlisted_product() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let products = ProductClient::new(client);

        let task = tokio::spawn(async move { products.adjust_stock(ProductId(7), -2).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, ProductId(7));
        responder.send(Ok(product(3))).unwrap();

        let (id, update, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, ProductId(7));
        assert_eq!(update.stock, Some(1));
        assert_eq!(update.status, None);
        responder.send(Ok(product(1))).unwrap();

        assert_eq!(task.await.unwrap().unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_adjust_stock_refuses_negative_stock() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let products = ProductClient::new(client);

        let task = tokio::spawn(async move { products.adjust_stock(ProductId(7), -5).await });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        responder.send(Ok(product(1))).unwrap();

        let result = task.await.unwrap();
        assert_eq!(
            result,
            Err(ProductError::InsufficientStock {
                id: ProductId(7),
                available: 1
            })
        );
        // No update was sent.
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_store_errors_carry_display_message() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let products = ProductClient::new(client);

        let task = tokio::spawn(async move {
            products
                .set_status(ProductId(7), ProductStatus::Archived)
                .await
        });

        let (_, update, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(update.status, Some(ProductStatus::Archived));
        responder
            .send(Err(FrameworkError::Api(ApiError::Status {
                status: 409,
                body: Some(serde_json::json!({ "message": "Product has open orders" })),
            })))
            .unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(ProductError::Store("Product has open orders".into()))
        );
    }
}
