use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::SystemConfig;
use crate::services::{
    CustomerClient, CustomerService, OrderClient, OrderService, OrderStoreClient,
    OrderStoreService, ProductClient, ProductService,
};

/// Starts every service, wires the clients together and stops them again.
///
/// Must be created inside a Tokio runtime.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub customer_client: CustomerClient,
    pub product_client: ProductClient,
    pub order_store_client: OrderStoreClient,
    handles: Vec<JoinHandle<()>>,
}

impl Default for OrderSystem {
    fn default() -> Self {
        Self::new(&SystemConfig::default())
    }
}

impl OrderSystem {
    /// Stores start first; the order service receives their clients.
    #[instrument(name = "order_system", skip(config), fields(channel_buffer = config.channel_buffer))]
    pub fn new(config: &SystemConfig) -> Self {
        let buffer = config.channel_buffer;
        let mut handles = Vec::new();

        info!("Starting order system");

        let (customer_service, customer_client) = CustomerService::new(buffer);
        handles.push(tokio::spawn(customer_service.run()));

        let (product_service, product_client) = ProductService::new(buffer);
        handles.push(tokio::spawn(product_service.run()));

        let (order_store, order_store_client) = OrderStoreService::new(buffer);
        handles.push(tokio::spawn(order_store.run()));

        let (order_service, order_client) = OrderService::new(
            buffer,
            customer_client.clone(),
            product_client.clone(),
            order_store_client.clone(),
        );
        handles.push(tokio::spawn(order_service.run()));

        info!("Order system started successfully");

        Self {
            order_client,
            customer_client,
            product_client,
            order_store_client,
            handles,
        }
    }

    /// Stops the order service first, then the stores, and waits for all tasks.
    #[instrument(skip(self))]
    pub async fn shutdown(self) {
        info!("Shutting down order system");

        if let Err(e) = self.order_client.shutdown().await {
            error!(error = %e, "Order service already stopped");
        }
        if let Err(e) = self.customer_client.shutdown().await {
            error!(error = %e, "Customer service already stopped");
        }
        if let Err(e) = self.product_client.shutdown().await {
            error!(error = %e, "Product service already stopped");
        }
        if let Err(e) = self.order_store_client.shutdown().await {
            error!(error = %e, "Order store already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Order system shutdown complete");
    }
}
