//! Collaborator interfaces used by order placement.
//!
//! The actor clients in [`crate::services`] implement these, and so can any
//! other store. Calls may suspend; timeouts belong to the implementation.

use async_trait::async_trait;

use crate::domain::{CatalogProduct, Customer, Order, OrderLine, StockUpdate};
use crate::error::{CustomerError, OrderStoreError, ProductError};

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, CustomerError>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Products matching `ids`. Unknown ids are left out, so the result may be shorter.
    async fn find_all_by_id(&self, ids: &[String]) -> Result<Vec<CatalogProduct>, ProductError>;

    /// Set absolute stock levels. Either every update is applied or none is.
    async fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<(), ProductError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist the order header and all its lines in one write.
    async fn create(&self, customer: Customer, products: Vec<OrderLine>) -> Result<Order, OrderStoreError>;
}
