use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{CatalogProduct, Order, OrderLine, OrderRequest, RequestedProduct, StockUpdate};
use crate::error::{OrderError, ProductError};
use crate::macros::ServiceResponse;
use crate::ports::{CustomerDirectory, OrderStore, ProductCatalog};
use crate::services::{CustomerClient, OrderStoreClient, ProductClient};

/// Places orders against a catalog with finite stock.
///
/// Steps run strictly in sequence and stop at the first failure. Nothing
/// already written is undone when a later step fails.
pub struct OrderPlacementService<C, P, S> {
    customers: C,
    catalog: P,
    orders: S,
}

impl<C, P, S> OrderPlacementService<C, P, S>
where
    C: CustomerDirectory,
    P: ProductCatalog,
    S: OrderStore,
{
    pub fn new(customers: C, catalog: P, orders: S) -> Self {
        Self {
            customers,
            catalog,
            orders,
        }
    }

    #[instrument(
        fields(customer_id = %request.customer_id, lines = request.products.len()),
        skip(self, request)
    )]
    pub async fn place_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
        info!("Placing order");

        let customer = match self
            .customers
            .find_by_id(&request.customer_id)
            .await
            .map_err(OrderError::Customers)?
        {
            Some(customer) => customer,
            None => {
                warn!("Customer not found");
                return Err(OrderError::CustomerNotFound);
            }
        };

        let ids = requested_ids(&request.products);
        let found = self
            .catalog
            .find_all_by_id(&ids)
            .await
            .map_err(OrderError::Catalog)?;
        if found.is_empty() {
            warn!("None of the requested products exist");
            return Err(OrderError::ProductsNotFound);
        }

        let catalog = index_by_id(found);
        check_coverage(&request.products, &catalog)?;
        check_stock(&request.products, &catalog)?;
        debug!("Order validated");

        let lines = price_lines(&request.products, &catalog)?;
        let order = self
            .orders
            .create(customer, lines)
            .await
            .map_err(OrderError::Store)?;
        info!(order_id = %order.id, total = ?order.total(), "Order persisted");

        let updates = stock_updates(&order, &catalog).map_err(|source| {
            error!(order_id = %order.id, error = %source, "Cannot compute stock levels for stored order");
            OrderError::StockNotApplied {
                order_id: order.id.clone(),
                source,
            }
        })?;

        if let Err(source) = self.catalog.update_quantity(updates).await {
            error!(
                order_id = %order.id,
                error = %source,
                "Order persisted but stock was not decremented"
            );
            return Err(OrderError::StockNotApplied {
                order_id: order.id.clone(),
                source,
            });
        }

        info!(order_id = %order.id, "Order placed successfully");
        Ok(order)
    }
}

/// Requested product ids in request order, each once.
fn requested_ids(products: &[RequestedProduct]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|product| seen.insert(product.id.as_str()))
        .map(|product| product.id.clone())
        .collect()
}

fn index_by_id(products: Vec<CatalogProduct>) -> HashMap<String, CatalogProduct> {
    products
        .into_iter()
        .map(|product| (product.id.clone(), product))
        .collect()
}

fn check_coverage(
    requested: &[RequestedProduct],
    catalog: &HashMap<String, CatalogProduct>,
) -> Result<(), OrderError> {
    match requested.iter().find(|line| !catalog.contains_key(&line.id)) {
        Some(missing) => {
            warn!(product_id = %missing.id, "Requested product does not exist");
            Err(OrderError::ProductNotFound(missing.id.clone()))
        }
        None => Ok(()),
    }
}

/// A line passes only when stock is strictly greater than the requested
/// quantity; asking for exactly what is left is refused. When a product is
/// requested on several lines, the combined quantity must pass as well.
fn check_stock(
    requested: &[RequestedProduct],
    catalog: &HashMap<String, CatalogProduct>,
) -> Result<(), OrderError> {
    let mut combined: HashMap<&str, u64> = HashMap::new();

    for line in requested {
        let Some(product) = catalog.get(&line.id) else {
            return Err(OrderError::ProductNotFound(line.id.clone()));
        };

        let total = combined.entry(line.id.as_str()).or_insert(0);
        *total += u64::from(line.quantity);

        if u64::from(product.quantity) <= *total {
            warn!(
                product_id = %line.id,
                available = product.quantity,
                requested = *total,
                "Insufficient stock"
            );
            return Err(OrderError::InsufficientStock(line.id.clone()));
        }
    }

    Ok(())
}

/// One line per requested line, priced from the snapshot.
fn price_lines(
    requested: &[RequestedProduct],
    catalog: &HashMap<String, CatalogProduct>,
) -> Result<Vec<OrderLine>, OrderError> {
    requested
        .iter()
        .map(|line| {
            let product = catalog
                .get(&line.id)
                .ok_or_else(|| OrderError::ProductNotFound(line.id.clone()))?;
            Ok(OrderLine {
                product_id: line.id.clone(),
                quantity: line.quantity,
                price: product.price,
            })
        })
        .collect()
}

/// New stock levels for the stored order, computed from the snapshot read
/// before validation. One update per product, in order of first appearance.
fn stock_updates(
    order: &Order,
    catalog: &HashMap<String, CatalogProduct>,
) -> Result<Vec<StockUpdate>, ProductError> {
    let mut updates: Vec<StockUpdate> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for line in &order.order_products {
        let product = catalog
            .get(&line.product_id)
            .ok_or_else(|| ProductError::NotFound(line.product_id.clone()))?;

        let index = *positions.entry(product.id.as_str()).or_insert_with(|| {
            updates.push(StockUpdate {
                id: product.id.clone(),
                quantity: product.quantity,
                expected: product.quantity,
            });
            updates.len() - 1
        });

        let remaining = updates[index].quantity;
        updates[index].quantity = remaining.checked_sub(line.quantity).ok_or_else(|| {
            ProductError::Validation(format!(
                "stored order takes {} of product {} but only {} were available",
                line.quantity, product.id, remaining
            ))
        })?;
    }
    Ok(updates)
}

// =============================================================================
// ROOT ACTOR
// =============================================================================

#[derive(Debug)]
pub enum OrderServiceRequest {
    PlaceOrder {
        request: OrderRequest,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>, OrderError>,
    },
    Shutdown,
}

/// Root actor that runs placements one at a time.
///
/// Because a placement is fully handled before the next message is read,
/// two orders sent through the same service never check and decrement stock
/// from the same snapshot.
pub struct OrderService {
    receiver: mpsc::Receiver<OrderServiceRequest>,
    placement: OrderPlacementService<CustomerClient, ProductClient, OrderStoreClient>,
    order_store: OrderStoreClient,
}

impl OrderService {
    pub fn new(
        buffer_size: usize,
        customer_client: CustomerClient,
        product_client: ProductClient,
        order_store: OrderStoreClient,
    ) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            placement: OrderPlacementService::new(
                customer_client,
                product_client,
                order_store.clone(),
            ),
            order_store,
        };
        (service, OrderClient::new(sender))
    }

    #[instrument(name = "order_service", skip(self))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderServiceRequest::PlaceOrder {
                    request,
                    respond_to,
                } => {
                    let result = self.placement.place_order(request).await;
                    let _ = respond_to.send(result);
                }
                OrderServiceRequest::GetOrder { id, respond_to } => {
                    self.handle_get_order(id, respond_to).await;
                }
                OrderServiceRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
            }
        }

        info!("OrderService stopped");
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    async fn handle_get_order(&self, id: String, respond_to: ServiceResponse<Option<Order>, OrderError>) {
        debug!("Processing get_order request");

        let result = self
            .order_store
            .get_order(id)
            .await
            .map_err(OrderError::Store);
        let _ = respond_to.send(result);
    }
}

/// Handle for [`OrderService`], the entry point for callers.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderServiceRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderServiceRequest>) -> Self {
        Self { sender }
    }
}

client_method!(OrderClient => fn place_order(request: OrderRequest) -> Order as OrderServiceRequest::PlaceOrder, OrderError);
client_method!(OrderClient => fn get_order(id: String) -> Option<Order> as OrderServiceRequest::GetOrder, OrderError);
client_shutdown!(OrderClient, OrderServiceRequest, OrderError);
