//! Product display data captured at add-to-cart time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Immutable copy of a product's display data.
///
/// Captured by value when the product is added to the cart; later catalog
/// changes (price updates, renamed products) do not retroactively affect
/// items already in the cart. For an existing line item the first-seen
/// snapshot wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Catalog identifier; also the line-item identity key.
    pub id: ProductId,
    /// Display name at add time.
    pub name: String,
    /// Unit price at add time. Serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product image URI.
    pub image: String,
    /// Optional display badge (e.g. "Nuevo", "Popular").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl ProductSnapshot {
    /// Create a new product snapshot.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
            badge: None,
        }
    }

    /// Set the display badge.
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }
}
