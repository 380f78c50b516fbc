use rust_decimal::Decimal;

/// A product in the catalog with its current price and available stock.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// New absolute stock level for one product.
///
/// `expected` is the quantity the new level was computed from. The catalog
/// refuses the update when the stored quantity no longer matches it.
#[derive(Debug, Clone, PartialEq)]
pub struct StockUpdate {
    pub id: String,
    pub quantity: u32,
    pub expected: u32,
}
