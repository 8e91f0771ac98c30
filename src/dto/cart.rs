use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

/// Per-line quantity ceiling; matches the CHECK on `cart_items.qty`.
pub const MAX_CART_QTY: i32 = 999;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QuantityChange {
    Increment,
    Decrement,
    Set { qty: i32 },
}

impl QuantityChange {
    /// New quantity for a row currently holding `current`, kept within
    /// `1..=MAX_CART_QTY`.
    pub fn apply(self, current: i32) -> i32 {
        let next = match self {
            QuantityChange::Increment => current.saturating_add(1),
            QuantityChange::Decrement => current.saturating_sub(1),
            QuantityChange::Set { qty } => qty,
        };
        next.clamp(1, MAX_CART_QTY)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub count: i64,
    pub total: i64,
}

impl CartSummary {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total = items
            .iter()
            .map(|item| item.price.saturating_mul(i64::from(item.qty)))
            .fold(0i64, i64::saturating_add);
        Self {
            count: items.len() as i64,
            total,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn item(price: i64, qty: i32) -> CartItem {
        CartItem {
            product_id: Uuid::new_v4(),
            name: "Kaos".into(),
            price,
            image: String::new(),
            qty,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn decrement_never_drops_below_one() {
        assert_eq!(QuantityChange::Decrement.apply(3), 2);
        assert_eq!(QuantityChange::Decrement.apply(1), 1);
        assert_eq!(QuantityChange::Decrement.apply(0), 1);
    }

    #[test]
    fn increment_and_set() {
        assert_eq!(QuantityChange::Increment.apply(1), 2);
        assert_eq!(QuantityChange::Set { qty: 7 }.apply(1), 7);
        assert_eq!(QuantityChange::Set { qty: -4 }.apply(5), 1);
    }

    #[test]
    fn parses_tagged_operations() {
        let change: QuantityChange = serde_json::from_str(r#"{"op":"decrement"}"#).unwrap();
        assert!(matches!(change, QuantityChange::Decrement));
        let change: QuantityChange = serde_json::from_str(r#"{"op":"set","qty":4}"#).unwrap();
        assert!(matches!(change, QuantityChange::Set { qty: 4 }));
    }

    #[test]
    fn quantity_is_capped() {
        assert_eq!(QuantityChange::Set { qty: i32::MAX }.apply(1), MAX_CART_QTY);
        assert_eq!(QuantityChange::Increment.apply(MAX_CART_QTY), MAX_CART_QTY);
        assert_eq!(QuantityChange::Increment.apply(i32::MAX), MAX_CART_QTY);
    }

    #[test]
    fn summary_total_saturates_instead_of_overflowing() {
        let summary = CartSummary::from_items(vec![
            item(5_000_000_000, i32::MAX),
            item(i64::MAX, 2),
        ]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total, i64::MAX);
    }

    #[test]
    fn summary_totals_price_times_qty() {
        let summary = CartSummary::from_items(vec![item(135_000, 2), item(50_000, 1)]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total, 320_000);
    }

    #[test]
    fn empty_cart_totals_zero() {
        let summary = CartSummary::from_items(Vec::new());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total, 0);
    }
}
