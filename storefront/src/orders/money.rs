//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;
use shared::order::{CartItem, OrderType};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// price × quantity
pub fn line_total(item: &CartItem) -> Decimal {
    to_decimal(item.item.price) * Decimal::from(item.quantity)
}

/// 小计 / 配送费 / 合计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

/// Σ(price × qty); the restaurant's fee applies only to delivery orders
pub fn calculate_totals(items: &[CartItem], order_type: OrderType, delivery_fee: f64) -> CartTotals {
    let subtotal: Decimal = items.iter().map(line_total).sum();
    let fee = match order_type {
        OrderType::Delivery => to_decimal(delivery_fee),
        OrderType::Pickup => Decimal::ZERO,
    };
    CartTotals {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(fee),
        total: to_f64(subtotal + fee),
    }
}

/// "R$ 25.00" as printed on receipts
pub fn format_brl(value: f64) -> String {
    format!("R$ {:.2}", to_f64(to_decimal(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::test_support::menu_item;

    fn cart_item(price: f64, quantity: u32) -> CartItem {
        CartItem {
            item: menu_item("x", price),
            quantity,
            restaurant_id: "1".into(),
            restaurant_name: "Volpony Burguer".into(),
        }
    }

    #[test]
    fn test_pickup_has_no_fee() {
        let items = vec![cart_item(25.0, 1), cart_item(18.0, 2)];
        let totals = calculate_totals(&items, OrderType::Pickup, 5.0);
        assert_eq!(totals.subtotal, 61.0);
        assert_eq!(totals.delivery_fee, 0.0);
        assert_eq!(totals.total, 61.0);
    }

    #[test]
    fn test_delivery_adds_fee() {
        let items = vec![cart_item(25.0, 1), cart_item(18.0, 2)];
        let totals = calculate_totals(&items, OrderType::Delivery, 5.0);
        assert_eq!(totals.subtotal, 61.0);
        assert_eq!(totals.delivery_fee, 5.0);
        assert_eq!(totals.total, 66.0);
    }

    #[test]
    fn test_no_float_drift() {
        let items = vec![cart_item(0.1, 3), cart_item(0.2, 1)];
        let totals = calculate_totals(&items, OrderType::Pickup, 0.0);
        assert_eq!(totals.subtotal, 0.5);
    }

    #[test]
    fn test_empty_cart() {
        let totals = calculate_totals(&[], OrderType::Delivery, 5.0);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 5.0);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(25.0), "R$ 25.00");
        assert_eq!(format_brl(5.5), "R$ 5.50");
    }
}
