//! # Order Client
//!
//! Fulfilment operations on the `Order` store.
//!
//! Orders in a final state (delivered, cancelled, refunded) are not moved
//! again. This is a client-side guard that saves a round trip; the backend
//! enforces its own transition rules and may reject others.
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use admin_framework::{CrudClient, FrameworkError, ResourceHandle};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("{0}")]
    Store(String),
    #[error("Order {id} is already {status}")]
    Finalized { id: OrderId, status: OrderStatus },
}

#[derive(Clone)]
pub struct OrderClient {
    inner: CrudClient<Order>,
}

impl OrderClient {
    pub fn new(inner: CrudClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    async fn current(&self, id: OrderId) -> Result<Order, OrderError> {
        match self.inner.find(&id) {
            Some(order) => Ok(order),
            None => self.inner.get(id).await.map_err(Self::map_error),
        }
    }

    /// Moves an order to `status`. Refused locally when the order is already
    /// final; every other transition is left to the backend to accept.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let current = self.current(id).await?;
        if current.status.is_final() && current.status != status {
            warn!(current = %current.status, "Order is final");
            return Err(OrderError::Finalized {
                id,
                status: current.status,
            });
        }

        info!(from = %current.status, to = %status, "Updating order status");
        self.inner
            .update(
                id,
                OrderUpdate {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .map_err(Self::map_error)
    }

    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.update_status(id, OrderStatus::Cancelled).await
    }

    /// Marks the order shipped with its carrier tracking number.
    #[instrument(skip(self))]
    pub async fn ship(&self, id: OrderId, tracking_number: String) -> Result<Order, OrderError> {
        let current = self.current(id).await?;
        if current.status.is_final() {
            return Err(OrderError::Finalized {
                id,
                status: current.status,
            });
        }
        self.inner
            .update(
                id,
                OrderUpdate {
                    status: Some(OrderStatus::Shipped),
                    tracking_number: Some(tracking_number),
                    notes: None,
                },
            )
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ResourceHandle<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &CrudClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::Store(e.display_message())
    }
}
