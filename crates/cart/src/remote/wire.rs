//! Wire types for the `/clients/cart` resource.
//!
//! Server fields are snake_case and flattened; `product_badge` is an
//! explicit `null` when the product has no badge. The conversions map
//! field-for-field onto [`LineItem`].

use rouse_core::{LineItem, ProductId, ProductSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One cart line as the server represents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireLineItem {
    pub product_id: String,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub product_price: Decimal,
    pub product_image: String,
    pub product_badge: Option<String>,
    pub quantity: u32,
}

/// Body of both the fetch response and the push request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CartPayload {
    pub items: Vec<WireLineItem>,
}

impl CartPayload {
    pub(crate) fn from_items(items: &[LineItem]) -> Self {
        Self {
            items: items.iter().map(WireLineItem::from).collect(),
        }
    }

    pub(crate) fn into_items(self) -> Vec<LineItem> {
        self.items.into_iter().map(LineItem::from).collect()
    }
}

impl From<&LineItem> for WireLineItem {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product.id.as_str().to_string(),
            product_name: item.product.name.clone(),
            product_price: item.product.price,
            product_image: item.product.image.clone(),
            product_badge: item.product.badge.clone(),
            quantity: item.quantity,
        }
    }
}

impl From<WireLineItem> for LineItem {
    fn from(wire: WireLineItem) -> Self {
        Self {
            product: ProductSnapshot {
                id: ProductId::new(wire.product_id),
                name: wire.product_name,
                price: wire.product_price,
                image: wire.product_image,
                badge: wire.product_badge,
            },
            quantity: wire.quantity,
        }
    }
}
