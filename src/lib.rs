//! # Order placement
//!
//! Places customer orders against a catalog with finite stock, built as a
//! small actor system on Tokio.
//!
//! - **Domain types** → [`domain`]
//! - **Collaborator interfaces** → [`ports::CustomerDirectory`], [`ports::ProductCatalog`], [`ports::OrderStore`]
//! - **Stores as actors** → [`services::CustomerService`], [`services::ProductService`], [`services::OrderStoreService`]
//! - **The workflow** → [`services::OrderPlacementService::place_order`]
//! - **Root actor** → [`services::OrderService`], reached through [`services::OrderClient`]
//! - **Startup and shutdown** → [`app_system::OrderSystem`]
//!
//! ```no_run
//! # use order_placement::app_system::{OrderSystem, SystemConfig};
//! # use order_placement::domain::{OrderRequest, RequestedProduct};
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let system = OrderSystem::new(&SystemConfig::default());
//! let order = system
//!     .order_client
//!     .place_order(OrderRequest::new("customer_1", vec![RequestedProduct::new("product_1", 3)]))
//!     .await?;
//! println!("placed {}", order.id);
//! system.shutdown().await;
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod app_system;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod mock_framework;

pub use error::{CustomerError, OrderError, OrderStoreError, ProductError};
pub use macros::ServiceResponse;
