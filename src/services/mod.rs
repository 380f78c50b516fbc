//! Actor services and the order placement workflow that drives them.

pub mod customer_service;
pub mod order_store;
pub mod placement;
pub mod product_service;

pub use customer_service::{CustomerClient, CustomerRequest, CustomerService};
pub use order_store::{OrderStoreClient, OrderStoreRequest, OrderStoreService};
pub use placement::{OrderClient, OrderPlacementService, OrderService, OrderServiceRequest};
pub use product_service::{ProductClient, ProductRequest, ProductService};
