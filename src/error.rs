use thiserror::Error;

/// Errors raised by the customer directory.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer validation error: {0}")]
    Validation(String),
    #[error("Email already in use: {0}")]
    EmailInUse(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

/// Errors raised by the product catalog.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product validation error: {0}")]
    Validation(String),
    #[error("Product name already in use: {0}")]
    NameInUse(String),
    #[error("Stock changed for product {id}: expected {expected}, found {actual}")]
    StockConflict { id: String, expected: u32, actual: u32 },
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

/// Errors raised by the order store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderStoreError {
    #[error("An order needs at least one line item")]
    EmptyOrder,
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

/// Errors returned to callers of order placement.
///
/// The first four variants are validation failures meant for the end user.
/// The rest are infrastructure faults from collaborators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Customer does not exist")]
    CustomerNotFound,
    #[error("Could not find products for the given IDs")]
    ProductsNotFound,
    #[error("Could not find product with ID: {0}")]
    ProductNotFound(String),
    #[error("No quantity available for product: {0}")]
    InsufficientStock(String),
    #[error("Customer lookup failed: {0}")]
    Customers(#[source] CustomerError),
    #[error("Catalog request failed: {0}")]
    Catalog(#[source] ProductError),
    #[error("Order store request failed: {0}")]
    Store(#[source] OrderStoreError),
    #[error("Order {order_id} was created but stock was not decremented: {source}")]
    StockNotApplied {
        order_id: String,
        #[source]
        source: ProductError,
    },
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl OrderError {
    /// True for failures caused by the request itself rather than a collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OrderError::CustomerNotFound
                | OrderError::ProductsNotFound
                | OrderError::ProductNotFound(_)
                | OrderError::InsufficientStock(_)
        )
    }
}
