use rust_decimal::Decimal;

use super::Customer;

/// One requested (product, quantity) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestedProduct {
    pub id: String,
    pub quantity: u32,
}

impl RequestedProduct {
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// Input to order placement.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub customer_id: String,
    pub products: Vec<RequestedProduct>,
}

impl OrderRequest {
    pub fn new(customer_id: impl Into<String>, products: Vec<RequestedProduct>) -> Self {
        Self {
            customer_id: customer_id.into(),
            products,
        }
    }
}

/// Line item handed to the order store, priced at the catalog snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// Persisted line item carrying the id assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderProduct {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer: Customer,
    pub order_products: Vec<OrderProduct>,
}

impl Order {
    /// Sum of `price * quantity` over all line items, or `None` if it does
    /// not fit in a `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        self.order_products.iter().try_fold(Decimal::ZERO, |sum, line| {
            line.price
                .checked_mul(Decimal::from(line.quantity))
                .and_then(|amount| sum.checked_add(amount))
        })
    }
}
