//! # Mock Framework
//!
//! Test doubles for the collaborators of order placement.
//!
//! [`Fixture`] builds an [`OrderPlacementService`] over in-memory fakes that
//! record every call, so tests can assert both the outcome and the exact
//! sequence of collaborator calls. [`create_mock_product_client`] hands out a
//! client whose requests land on a channel the test reads directly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, Mutex};

use crate::domain::{CatalogProduct, Customer, Order, OrderLine, OrderProduct, StockUpdate};
use crate::error::{CustomerError, OrderStoreError, ProductError};
use crate::ports::{CustomerDirectory, OrderStore, ProductCatalog};
use crate::services::{OrderPlacementService, ProductClient, ProductRequest};

/// Creates a product client and the receiver its requests arrive on.
pub fn create_mock_product_client(buffer_size: usize) -> (ProductClient, mpsc::Receiver<ProductRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ProductClient::new(sender), receiver)
}

/// A collaborator call as seen by the fakes.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindCustomer(String),
    FindProducts(Vec<String>),
    CreateOrder(Vec<OrderLine>),
    UpdateQuantity(Vec<StockUpdate>),
}

type CallLog = Arc<Mutex<Vec<Call>>>;

pub struct FakeCustomers {
    customers: HashMap<String, Customer>,
    calls: CallLog,
    offline: bool,
}

#[async_trait]
impl CustomerDirectory for FakeCustomers {
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, CustomerError> {
        self.calls.lock().await.push(Call::FindCustomer(id.to_string()));
        if self.offline {
            return Err(CustomerError::ActorCommunication("directory offline".to_string()));
        }
        Ok(self.customers.get(id).cloned())
    }
}

pub struct FakeCatalog {
    products: Arc<Mutex<HashMap<String, CatalogProduct>>>,
    calls: CallLog,
    updates_offline: bool,
}

#[async_trait]
impl ProductCatalog for FakeCatalog {
    async fn find_all_by_id(&self, ids: &[String]) -> Result<Vec<CatalogProduct>, ProductError> {
        self.calls.lock().await.push(Call::FindProducts(ids.to_vec()));
        let products = self.products.lock().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<(), ProductError> {
        self.calls.lock().await.push(Call::UpdateQuantity(updates.clone()));
        if self.updates_offline {
            return Err(ProductError::ActorCommunication("catalog offline".to_string()));
        }
        let mut products = self.products.lock().await;
        for update in updates {
            let product = products
                .get_mut(&update.id)
                .ok_or_else(|| ProductError::NotFound(update.id.clone()))?;
            product.quantity = update.quantity;
        }
        Ok(())
    }
}

pub struct FakeOrders {
    orders: Arc<Mutex<Vec<Order>>>,
    calls: CallLog,
    next_id: Arc<AtomicU64>,
    offline: bool,
}

#[async_trait]
impl OrderStore for FakeOrders {
    async fn create(&self, customer: Customer, products: Vec<OrderLine>) -> Result<Order, OrderStoreError> {
        self.calls.lock().await.push(Call::CreateOrder(products.clone()));
        if self.offline {
            return Err(OrderStoreError::ActorCommunication("store offline".to_string()));
        }

        let order_id = format!("order_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let order = Order {
            id: order_id.clone(),
            customer,
            order_products: products
                .into_iter()
                .enumerate()
                .map(|(n, line)| OrderProduct {
                    id: format!("{order_id}_line_{n}"),
                    order_id: order_id.clone(),
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
        };
        self.orders.lock().await.push(order.clone());
        Ok(order)
    }
}

/// Shared state behind a set of fakes.
pub struct Fixture {
    customers: HashMap<String, Customer>,
    products: Arc<Mutex<HashMap<String, CatalogProduct>>>,
    orders: Arc<Mutex<Vec<Order>>>,
    calls: CallLog,
    next_order_id: Arc<AtomicU64>,
    customer_lookup_offline: bool,
    stock_updates_offline: bool,
    order_store_offline: bool,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            customers: HashMap::new(),
            products: Arc::new(Mutex::new(HashMap::new())),
            orders: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_order_id: Arc::new(AtomicU64::new(1)),
            customer_lookup_offline: false,
            stock_updates_offline: false,
            order_store_offline: false,
        }
    }

    pub fn with_customer(mut self, id: &str) -> Self {
        let customer = Customer {
            id: id.to_string(),
            name: format!("Customer {id}"),
            email: format!("{}@example.com", id.to_lowercase()),
        };
        self.customers.insert(id.to_string(), customer);
        self
    }

    pub fn with_product(self, id: &str, price: Decimal, quantity: u32) -> Self {
        let product = CatalogProduct {
            id: id.to_string(),
            name: format!("Product {id}"),
            price,
            quantity,
        };
        self.products
            .try_lock()
            .expect("fixture is not shared while building")
            .insert(id.to_string(), product);
        self
    }

    pub fn failing_customer_lookup(mut self) -> Self {
        self.customer_lookup_offline = true;
        self
    }

    pub fn failing_stock_updates(mut self) -> Self {
        self.stock_updates_offline = true;
        self
    }

    pub fn failing_order_store(mut self) -> Self {
        self.order_store_offline = true;
        self
    }

    pub fn service(&self) -> OrderPlacementService<FakeCustomers, FakeCatalog, FakeOrders> {
        OrderPlacementService::new(
            FakeCustomers {
                customers: self.customers.clone(),
                calls: self.calls.clone(),
                offline: self.customer_lookup_offline,
            },
            FakeCatalog {
                products: self.products.clone(),
                calls: self.calls.clone(),
                updates_offline: self.stock_updates_offline,
            },
            FakeOrders {
                orders: self.orders.clone(),
                calls: self.calls.clone(),
                next_id: self.next_order_id.clone(),
                offline: self.order_store_offline,
            },
        )
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn stock(&self, id: &str) -> Option<u32> {
        self.products.lock().await.get(id).map(|p| p.quantity)
    }

    pub async fn set_price(&self, id: &str, price: Decimal) {
        if let Some(product) = self.products.lock().await.get_mut(id) {
            product.price = price;
        }
    }

    pub async fn orders_created(&self) -> Vec<Order> {
        self.orders.lock().await.clone()
    }

    pub async fn stored_order(&self, id: &str) -> Option<Order> {
        self.orders.lock().await.iter().find(|o| o.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn fakes_record_calls_in_order() {
        let fixture = Fixture::new().with_customer("C1").with_product("P1", dec!(1), 3);
        let service = fixture.service();
        let _ = service
            .place_order(crate::domain::OrderRequest::new("C1", Vec::new()))
            .await;

        assert_eq!(
            fixture.calls().await,
            vec![
                Call::FindCustomer("C1".to_string()),
                Call::FindProducts(Vec::new()),
            ]
        );
    }
}
