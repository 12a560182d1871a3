//! The authoritative in-memory cart collection.
//!
//! Insertion order is preserved: new products append, and updates to an
//! existing product keep its original position. The ledger owns the two
//! line-item invariants - at most one line per product id, and quantity
//! always >= 1 (a line whose quantity would reach zero is removed).
//!
//! All operations are synchronous; persistence and remote pushes are wired
//! up one level above, in [`crate::state`].

use rouse_core::{LineItem, ProductId, ProductSnapshot};
use rust_decimal::Decimal;

/// Ordered collection of cart line items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    items: Vec<LineItem>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create a ledger from a previously persisted item list.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// If a line for `product.id` already exists its quantity is incremented
    /// and the newly supplied snapshot is discarded - the first-seen snapshot
    /// wins. Otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, product: ProductSnapshot) {
        match self
            .items
            .iter()
            .position(|item| item.product.id == product.id)
        {
            Some(pos) => {
                if let Some(item) = self.items.get_mut(pos) {
                    item.quantity += 1;
                }
            }
            None => self.items.push(LineItem::new(product)),
        }
    }

    /// Remove one unit of `product_id`; the line is removed entirely when
    /// its quantity would reach zero. No-op if the id is absent.
    pub fn decrement(&mut self, product_id: &ProductId) {
        let Some(pos) = self
            .items
            .iter()
            .position(|item| &item.product.id == product_id)
        else {
            return;
        };

        if self.items.get(pos).is_none_or(|item| item.quantity <= 1) {
            self.items.remove(pos);
        } else if let Some(item) = self.items.get_mut(pos) {
            item.quantity -= 1;
        }
    }

    /// Remove the line for `product_id` regardless of quantity.
    /// No-op if the id is absent.
    pub fn delete(&mut self, product_id: &ProductId) {
        self.items.retain(|item| &item.product.id != product_id);
    }

    /// Set the quantity for `product_id` to the exact given value.
    ///
    /// A quantity of zero behaves as [`Self::delete`]. An absent id is a
    /// no-op - this never creates a new line.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.delete(product_id);
            return;
        }
        if let Some(item) = self.find_mut(product_id) {
            item.quantity = quantity;
        }
    }

    /// Empty the collection.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Discard the current contents entirely in favor of `items`.
    ///
    /// Used by the reconciler on identity transitions - a wholesale replace,
    /// never a merge.
    pub fn replace(&mut self, items: Vec<LineItem>) {
        self.items = items;
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Total price across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::Rng;
    use rust_decimal::dec;

    use super::*;

    fn product(id: &str, price: Decimal) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Product {id}"), price, format!("/img/{id}.jpg"))
    }

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_appends_then_increments() {
        let mut ledger = Ledger::new();
        ledger.add(product("a", dec!(1.00)));
        ledger.add(product("b", dec!(2.00)));
        ledger.add(product("a", dec!(1.00)));

        let items = ledger.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product.id, pid("a"));
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].product.id, pid("b"));
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_first_seen_snapshot_wins() {
        let mut ledger = Ledger::new();
        ledger.add(product("x", dec!(10)));
        ledger.add(product("x", dec!(99)));

        let items = ledger.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.price, dec!(10));
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_existing_line_keeps_its_position() {
        let mut ledger = Ledger::new();
        ledger.add(product("a", dec!(1)));
        ledger.add(product("b", dec!(2)));
        ledger.add(product("c", dec!(3)));
        ledger.set_quantity(&pid("b"), 9);
        ledger.add(product("a", dec!(1)));

        let ids: Vec<_> = ledger.items().iter().map(|i| i.product.id.as_str().to_string()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_decrement_removes_at_zero_and_floors_there() {
        let mut ledger = Ledger::new();
        ledger.add(product("a", dec!(1)));
        ledger.add(product("a", dec!(1)));

        ledger.decrement(&pid("a"));
        assert_eq!(ledger.items()[0].quantity, 1);

        ledger.decrement(&pid("a"));
        assert!(ledger.is_empty());

        // Repeated decrements never resurrect a zero-quantity line.
        ledger.decrement(&pid("a"));
        ledger.decrement(&pid("a"));
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_items(), 0);
    }

    #[test]
    fn test_delete_removes_regardless_of_quantity() {
        let mut ledger = Ledger::new();
        ledger.add(product("a", dec!(1)));
        ledger.set_quantity(&pid("a"), 7);

        ledger.delete(&pid("a"));
        assert!(ledger.is_empty());

        // Deleting an absent id is a no-op.
        ledger.delete(&pid("a"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_set_quantity_is_exact_not_incremental() {
        let mut ledger = Ledger::new();
        ledger.add(product("a", dec!(1)));

        ledger.set_quantity(&pid("a"), 5);
        assert_eq!(ledger.items()[0].quantity, 5);

        ledger.set_quantity(&pid("a"), 5);
        assert_eq!(ledger.items()[0].quantity, 5);
    }

    #[test]
    fn test_set_quantity_zero_deletes() {
        let mut ledger = Ledger::new();
        ledger.add(product("a", dec!(1)));

        ledger.set_quantity(&pid("a"), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_set_quantity_never_creates_a_line() {
        let mut ledger = Ledger::new();
        ledger.set_quantity(&pid("ghost"), 3);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_one_line_per_product_id() {
        let mut ledger = Ledger::new();
        for _ in 0..3 {
            ledger.add(product("a", dec!(1)));
            ledger.add(product("b", dec!(2)));
        }

        assert_eq!(ledger.items().len(), 2);
        assert!(ledger.items().iter().all(|i| i.quantity == 3));
        assert_eq!(ledger.total_items(), 6);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut ledger = Ledger::new();
        ledger.add(product("a", dec!(1)));
        ledger.add(product("a", dec!(1)));

        ledger.replace(vec![LineItem::new(product("b", dec!(2)))]);

        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.items()[0].product.id, pid("b"));
    }

    #[test]
    fn test_totals_match_model_under_random_mutations() {
        let ids = ["a", "b", "c", "d", "e"];
        let price_of = |id: &str| match id {
            "a" => dec!(1.25),
            "b" => dec!(2.00),
            "c" => dec!(0.75),
            "d" => dec!(4.50),
            _ => dec!(9.99),
        };

        let mut rng = rand::rng();
        let mut ledger = Ledger::new();
        let mut model: HashMap<&str, u32> = HashMap::new();

        for _ in 0..1000 {
            let id = ids[rng.random_range(0..ids.len())];
            match rng.random_range(0_u8..4) {
                0 => {
                    ledger.add(product(id, price_of(id)));
                    *model.entry(id).or_insert(0) += 1;
                }
                1 => {
                    ledger.decrement(&pid(id));
                    if let Some(q) = model.get_mut(id) {
                        *q -= 1;
                        if *q == 0 {
                            model.remove(id);
                        }
                    }
                }
                2 => {
                    ledger.delete(&pid(id));
                    model.remove(id);
                }
                _ => {
                    let quantity = rng.random_range(0..5);
                    ledger.set_quantity(&pid(id), quantity);
                    if model.contains_key(id) {
                        if quantity == 0 {
                            model.remove(id);
                        } else {
                            model.insert(id, quantity);
                        }
                    }
                }
            }

            let expected_items: u32 = model.values().sum();
            let expected_price: Decimal = model
                .iter()
                .map(|(id, q)| price_of(id) * Decimal::from(*q))
                .sum();
            assert_eq!(ledger.total_items(), expected_items);
            assert_eq!(ledger.total_price(), expected_price);
        }
    }
}
