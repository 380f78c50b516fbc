use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{CatalogProduct, NewProduct, StockUpdate};
use crate::error::ProductError;
use crate::macros::ServiceResponse;
use crate::ports::ProductCatalog;

#[derive(Debug)]
pub enum ProductRequest {
    GetProduct {
        id: String,
        respond_to: ServiceResponse<Option<CatalogProduct>, ProductError>,
    },
    GetProducts {
        ids: Vec<String>,
        respond_to: ServiceResponse<Vec<CatalogProduct>, ProductError>,
    },
    CreateProduct {
        product: NewProduct,
        respond_to: ServiceResponse<CatalogProduct, ProductError>,
    },
    UpdateStock {
        updates: Vec<StockUpdate>,
        respond_to: ServiceResponse<(), ProductError>,
    },
    Shutdown,
}

/// Owns the catalog: prices and available stock.
///
/// Each message is handled to completion before the next one is read, so a
/// batch of stock updates is checked and applied without interleaving.
pub struct ProductService {
    receiver: mpsc::Receiver<ProductRequest>,
    products: HashMap<String, CatalogProduct>,
    next_id: u64,
}

impl ProductService {
    pub fn new(buffer_size: usize) -> (Self, ProductClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            products: HashMap::new(),
            next_id: 1,
        };
        (service, ProductClient::new(sender))
    }

    #[instrument(name = "product_service", skip(self))]
    pub async fn run(mut self) {
        info!("ProductService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ProductRequest::GetProduct { id, respond_to } => {
                    self.handle_get_product(id, respond_to);
                }
                ProductRequest::GetProducts { ids, respond_to } => {
                    self.handle_get_products(ids, respond_to);
                }
                ProductRequest::CreateProduct {
                    product,
                    respond_to,
                } => {
                    self.handle_create_product(product, respond_to);
                }
                ProductRequest::UpdateStock {
                    updates,
                    respond_to,
                } => {
                    self.handle_update_stock(updates, respond_to);
                }
                ProductRequest::Shutdown => {
                    info!("ProductService shutting down");
                    break;
                }
            }
        }

        info!("ProductService stopped");
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_get_product(
        &self,
        id: String,
        respond_to: ServiceResponse<Option<CatalogProduct>, ProductError>,
    ) {
        debug!("Processing get_product request");

        let product = self.products.get(&id).cloned();
        match &product {
            Some(product) => {
                info!(product_name = %product.name, price = %product.price, "Product found")
            }
            None => debug!("Product not found"),
        }

        let _ = respond_to.send(Ok(product));
    }

    #[instrument(fields(requested = ids.len()), skip(self, ids, respond_to))]
    fn handle_get_products(
        &self,
        ids: Vec<String>,
        respond_to: ServiceResponse<Vec<CatalogProduct>, ProductError>,
    ) {
        debug!("Processing get_products request");

        let mut seen = HashSet::new();
        let products: Vec<CatalogProduct> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.products.get(id).cloned())
            .collect();

        info!(found = products.len(), "Products looked up");
        let _ = respond_to.send(Ok(products));
    }

    #[instrument(fields(product_name = %product.name, price = %product.price), skip(self, product, respond_to))]
    fn handle_create_product(
        &mut self,
        product: NewProduct,
        respond_to: ServiceResponse<CatalogProduct, ProductError>,
    ) {
        debug!("Processing create_product request");

        if product.name.trim().is_empty() {
            warn!("Validation failed: empty name");
            send_error!(
                respond_to,
                ProductError::Validation("name is required".to_string())
            );
        }

        if product.price < Decimal::ZERO {
            warn!("Validation failed: negative price");
            send_error!(
                respond_to,
                ProductError::Validation(format!("price must not be negative: {}", product.price))
            );
        }

        if self.products.values().any(|p| p.name == product.name) {
            warn!("Product name already registered");
            send_error!(respond_to, ProductError::NameInUse(product.name));
        }

        let id = format!("product_{}", self.next_id);
        self.next_id += 1;
        let created = CatalogProduct {
            id: id.clone(),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
        };
        self.products.insert(id.clone(), created.clone());

        info!(product_id = %id, quantity = created.quantity, "Product created successfully");
        let _ = respond_to.send(Ok(created));
    }

    /// Compare-and-swap over the whole batch: nothing is written unless every
    /// product exists and still holds its `expected` quantity.
    #[instrument(fields(updates = updates.len()), skip(self, updates, respond_to))]
    fn handle_update_stock(
        &mut self,
        updates: Vec<StockUpdate>,
        respond_to: ServiceResponse<(), ProductError>,
    ) {
        debug!("Processing update_stock request");

        let mut staged: HashMap<&str, u32> = HashMap::new();
        for update in &updates {
            let current = match staged.get(update.id.as_str()) {
                Some(quantity) => *quantity,
                None => match self.products.get(&update.id) {
                    Some(product) => product.quantity,
                    None => {
                        error!(product_id = %update.id, "Product not found");
                        send_error!(respond_to, ProductError::NotFound(update.id.clone()));
                    }
                },
            };

            if current != update.expected {
                error!(
                    product_id = %update.id,
                    expected = update.expected,
                    actual = current,
                    "Stock changed since it was read"
                );
                send_error!(
                    respond_to,
                    ProductError::StockConflict {
                        id: update.id.clone(),
                        expected: update.expected,
                        actual: current,
                    }
                );
            }

            staged.insert(update.id.as_str(), update.quantity);
        }

        for (id, quantity) in staged {
            if let Some(product) = self.products.get_mut(id) {
                debug!(product_id = %id, from = product.quantity, to = quantity, "Stock updated");
                product.quantity = quantity;
            }
        }

        info!("Stock updated successfully");
        let _ = respond_to.send(Ok(()));
    }
}

/// Handle for [`ProductService`].
#[derive(Clone)]
pub struct ProductClient {
    sender: mpsc::Sender<ProductRequest>,
}

impl ProductClient {
    pub fn new(sender: mpsc::Sender<ProductRequest>) -> Self {
        Self { sender }
    }
}

client_method!(ProductClient => fn get_product(id: String) -> Option<CatalogProduct> as ProductRequest::GetProduct, ProductError);
client_method!(ProductClient => fn get_products(ids: Vec<String>) -> Vec<CatalogProduct> as ProductRequest::GetProducts, ProductError);
client_method!(ProductClient => fn create_product(product: NewProduct) -> CatalogProduct as ProductRequest::CreateProduct, ProductError);
client_method!(ProductClient => fn update_stock(updates: Vec<StockUpdate>) -> () as ProductRequest::UpdateStock, ProductError);
client_shutdown!(ProductClient, ProductRequest, ProductError);

#[async_trait]
impl ProductCatalog for ProductClient {
    async fn find_all_by_id(&self, ids: &[String]) -> Result<Vec<CatalogProduct>, ProductError> {
        self.get_products(ids.to_vec()).await
    }

    async fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<(), ProductError> {
        self.update_stock(updates).await
    }
}
