//! A single product + quantity pairing in the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::product::ProductSnapshot;

/// One line of the cart: a product snapshot and how many of it.
///
/// Identity key is `product.id` - the ledger holds at most one line item per
/// distinct product id. Quantity is always a positive integer; a line whose
/// quantity would drop to zero is removed from the ledger rather than kept
/// around at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product display data captured at add time.
    pub product: ProductSnapshot,
    /// Number of units, always >= 1.
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item for a single unit of `product`.
    #[must_use]
    pub const fn new(product: ProductSnapshot) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}
