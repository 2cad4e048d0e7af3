//! Per-user cart: `product_id -> size -> quantity`.
//!
//! Every stored quantity is positive and no product keeps an empty size map.
//! Data read back from storage is normalised on deserialization, so rows
//! written by older clients (zero quantities, empty size maps) are cleaned up
//! on the next write.

use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type RawCart = BTreeMap<i32, BTreeMap<String, i32>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCart", into = "RawCart")]
pub struct CartData {
    items: RawCart,
}

/// One `(product, size)` entry of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub product_id: i32,
    pub size: &'a str,
    pub quantity: i32,
}

impl CartData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `size` for `product_id`.
    pub fn add_item(&mut self, product_id: i32, size: &str) -> Result<i32, ServiceError> {
        let quantity = self
            .items
            .entry(product_id)
            .or_default()
            .entry(size.to_string())
            .or_insert(0);

        *quantity = quantity
            .checked_add(1)
            .ok_or_else(|| ServiceError::validation("Quantity is too large"))?;

        Ok(*quantity)
    }

    /// Overwrites the quantity for `(product_id, size)`; zero removes the entry.
    pub fn set_quantity(
        &mut self,
        product_id: i32,
        size: &str,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        if quantity < 0 {
            return Err(ServiceError::validation("Quantity cannot be negative"));
        }

        if quantity == 0 {
            if let Some(sizes) = self.items.get_mut(&product_id) {
                sizes.remove(size);
                if sizes.is_empty() {
                    self.items.remove(&product_id);
                }
            }
            return Ok(());
        }

        self.items
            .entry(product_id)
            .or_default()
            .insert(size.to_string(), quantity);

        Ok(())
    }

    pub fn quantity(&self, product_id: i32, size: &str) -> i32 {
        self.items
            .get(&product_id)
            .and_then(|sizes| sizes.get(size))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn product_ids(&self) -> Vec<i32> {
        self.items.keys().copied().collect()
    }

    pub fn lines(&self) -> impl Iterator<Item = CartLine<'_>> {
        self.items.iter().flat_map(|(product_id, sizes)| {
            sizes.iter().map(move |(size, quantity)| CartLine {
                product_id: *product_id,
                size: size.as_str(),
                quantity: *quantity,
            })
        })
    }

    /// Total number of units across all products and sizes.
    pub fn total_count(&self) -> i64 {
        self.lines().map(|line| i64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity`. Products `price_of` does not know are
    /// skipped, matching a storefront whose catalogue no longer lists them.
    pub fn amount<F>(&self, price_of: F) -> Result<i64, ServiceError>
    where
        F: Fn(i32) -> Option<i64>,
    {
        let mut total: i64 = 0;

        for line in self.lines() {
            let Some(price) = price_of(line.product_id) else {
                continue;
            };

            total = price
                .checked_mul(i64::from(line.quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or_else(|| ServiceError::validation("Cart amount overflow"))?;
        }

        Ok(total)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl From<RawCart> for CartData {
    fn from(raw: RawCart) -> Self {
        let items = raw
            .into_iter()
            .filter_map(|(product_id, sizes)| {
                let sizes: BTreeMap<String, i32> =
                    sizes.into_iter().filter(|(_, qty)| *qty > 0).collect();
                (!sizes.is_empty()).then_some((product_id, sizes))
            })
            .collect();

        Self { items }
    }
}

impl From<CartData> for RawCart {
    fn from(cart: CartData) -> Self {
        cart.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn add_item_creates_then_increments() -> TestResult {
        let mut cart = CartData::new();

        assert_eq!(cart.add_item(7, "M")?, 1);
        assert_eq!(cart.add_item(7, "M")?, 2);
        assert_eq!(cart.add_item(7, "L")?, 1);

        assert_eq!(cart.quantity(7, "M"), 2);
        assert_eq!(cart.quantity(7, "L"), 1);
        assert_eq!(cart.total_count(), 3);

        Ok(())
    }

    #[test]
    fn zero_quantity_removes_size_and_empty_product() -> TestResult {
        let mut cart = CartData::new();
        cart.add_item(1, "S")?;
        cart.add_item(1, "M")?;

        cart.set_quantity(1, "S", 0)?;
        assert_eq!(cart.quantity(1, "S"), 0);
        assert_eq!(cart.product_ids(), vec![1]);

        cart.set_quantity(1, "M", 0)?;
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn zero_quantity_on_missing_entry_is_a_no_op() -> TestResult {
        let mut cart = CartData::new();
        cart.set_quantity(42, "XL", 0)?;
        assert!(cart.is_empty());
        Ok(())
    }

    #[test]
    fn set_quantity_overwrites() -> TestResult {
        let mut cart = CartData::new();
        cart.add_item(3, "M")?;
        cart.set_quantity(3, "M", 5)?;
        cart.set_quantity(4, "L", 2)?;

        assert_eq!(cart.quantity(3, "M"), 5);
        assert_eq!(cart.total_count(), 7);
        Ok(())
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut cart = CartData::new();
        let result = cart.set_quantity(3, "M", -1);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn amount_skips_unknown_products() -> TestResult {
        let mut cart = CartData::new();
        cart.set_quantity(1, "M", 2)?;
        cart.set_quantity(1, "L", 1)?;
        cart.set_quantity(2, "S", 4)?;

        let amount = cart.amount(|id| (id == 1).then_some(150))?;
        assert_eq!(amount, 450);
        Ok(())
    }

    #[test]
    fn amount_overflow_is_an_error() -> TestResult {
        let mut cart = CartData::new();
        cart.set_quantity(1, "M", 2)?;

        let result = cart.amount(|_| Some(i64::MAX));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[test]
    fn json_uses_string_product_keys() -> TestResult {
        let mut cart = CartData::new();
        cart.set_quantity(12, "M", 2)?;

        let json = serde_json::to_value(&cart)?;
        assert_eq!(json, serde_json::json!({ "12": { "M": 2 } }));
        Ok(())
    }

    #[test]
    fn stored_data_is_normalised_on_read() -> TestResult {
        let json = serde_json::json!({
            "1": { "M": 0, "L": 3 },
            "2": { "S": 0 },
            "3": {}
        });

        let cart: CartData = serde_json::from_value(json)?;

        assert_eq!(cart.product_ids(), vec![1]);
        assert_eq!(cart.quantity(1, "L"), 3);
        assert_eq!(cart.quantity(1, "M"), 0);
        Ok(())
    }
}
