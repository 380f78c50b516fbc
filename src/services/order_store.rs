use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Customer, Order, OrderLine, OrderProduct};
use crate::error::OrderStoreError;
use crate::macros::ServiceResponse;
use crate::ports::OrderStore;

#[derive(Debug)]
pub enum OrderStoreRequest {
    CreateOrder {
        customer: Customer,
        products: Vec<OrderLine>,
        respond_to: ServiceResponse<Order, OrderStoreError>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>, OrderStoreError>,
    },
    Shutdown,
}

/// Persists orders. An order and all of its lines are written by one message.
pub struct OrderStoreService {
    receiver: mpsc::Receiver<OrderStoreRequest>,
    orders: HashMap<String, Order>,
    next_order_id: u64,
    next_line_id: u64,
}

impl OrderStoreService {
    pub fn new(buffer_size: usize) -> (Self, OrderStoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            orders: HashMap::new(),
            next_order_id: 1,
            next_line_id: 1,
        };
        (service, OrderStoreClient::new(sender))
    }

    #[instrument(name = "order_store", skip(self))]
    pub async fn run(mut self) {
        info!("OrderStoreService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderStoreRequest::CreateOrder {
                    customer,
                    products,
                    respond_to,
                } => {
                    self.handle_create_order(customer, products, respond_to);
                }
                OrderStoreRequest::GetOrder { id, respond_to } => {
                    self.handle_get_order(id, respond_to);
                }
                OrderStoreRequest::Shutdown => {
                    info!("OrderStoreService shutting down");
                    break;
                }
            }
        }

        info!("OrderStoreService stopped");
    }

    #[instrument(fields(customer_id = %customer.id, lines = products.len()), skip(self, customer, products, respond_to))]
    fn handle_create_order(
        &mut self,
        customer: Customer,
        products: Vec<OrderLine>,
        respond_to: ServiceResponse<Order, OrderStoreError>,
    ) {
        debug!("Processing create_order request");

        if products.is_empty() {
            warn!("Refusing order without line items");
            send_error!(respond_to, OrderStoreError::EmptyOrder);
        }

        let order_id = format!("order_{}", self.next_order_id);
        self.next_order_id += 1;

        let order_products = products
            .into_iter()
            .map(|line| {
                let id = format!("order_product_{}", self.next_line_id);
                self.next_line_id += 1;
                OrderProduct {
                    id,
                    order_id: order_id.clone(),
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                }
            })
            .collect();

        let order = Order {
            id: order_id.clone(),
            customer,
            order_products,
        };
        self.orders.insert(order_id.clone(), order.clone());

        info!(order_id = %order_id, total = ?order.total(), "Order stored");
        let _ = respond_to.send(Ok(order));
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    fn handle_get_order(&self, id: String, respond_to: ServiceResponse<Option<Order>, OrderStoreError>) {
        debug!("Processing get_order request");

        let order = self.orders.get(&id).cloned();
        match &order {
            Some(order) => info!(total = ?order.total(), "Order found"),
            None => debug!("Order not found"),
        }

        let _ = respond_to.send(Ok(order));
    }
}

/// Handle for [`OrderStoreService`].
#[derive(Clone)]
pub struct OrderStoreClient {
    sender: mpsc::Sender<OrderStoreRequest>,
}

impl OrderStoreClient {
    pub fn new(sender: mpsc::Sender<OrderStoreRequest>) -> Self {
        Self { sender }
    }
}

client_method!(OrderStoreClient => fn create_order(customer: Customer, products: Vec<OrderLine>) -> Order as OrderStoreRequest::CreateOrder, OrderStoreError);
client_method!(OrderStoreClient => fn get_order(id: String) -> Option<Order> as OrderStoreRequest::GetOrder, OrderStoreError);
client_shutdown!(OrderStoreClient, OrderStoreRequest, OrderStoreError);

#[async_trait]
impl OrderStore for OrderStoreClient {
    async fn create(&self, customer: Customer, products: Vec<OrderLine>) -> Result<Order, OrderStoreError> {
        self.create_order(customer, products).await
    }
}
