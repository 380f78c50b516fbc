//! Business entities shared by the services. Pure data, no actor concerns.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::*;
pub use order::*;
pub use product::*;
