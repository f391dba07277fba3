//! 购物车
//!
//! A cart only ever holds items from one restaurant. Adding from another
//! restaurant needs an explicit decision: clear the cart and add, or keep
//! the cart and drop the new item.

use serde::{Deserialize, Serialize};
use shared::models::{MenuItem, Restaurant};
use shared::order::{CartItem, OrderType};

use crate::orders::money::{self, CartTotals};

/// Answer to "you already have items from another store, clear the cart?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    ClearCart,
    KeepCart,
}

/// What [`Cart::add`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New line with quantity 1
    Added,
    /// Existing line got +1
    Incremented,
    /// Cart held another store's items; they were discarded first
    Replaced,
    /// Conflict declined, cart unchanged
    Declined,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Store every line belongs to
    pub fn restaurant_id(&self) -> Option<&str> {
        self.items.first().map(|i| i.restaurant_id.as_str())
    }

    /// Adding from `restaurant` would need a clear-cart confirmation
    pub fn conflicts_with(&self, restaurant: &Restaurant) -> bool {
        self.restaurant_id().is_some_and(|id| id != restaurant.id)
    }

    /// Sum of quantities (header badge)
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn add(
        &mut self,
        restaurant: &Restaurant,
        item: &MenuItem,
        on_conflict: ConflictResolution,
    ) -> AddOutcome {
        let replaced = if self.conflicts_with(restaurant) {
            match on_conflict {
                ConflictResolution::KeepCart => return AddOutcome::Declined,
                ConflictResolution::ClearCart => {
                    self.items.clear();
                    true
                }
            }
        } else {
            false
        };

        if let Some(line) = self.items.iter_mut().find(|i| i.item.id == item.id) {
            line.quantity += 1;
            return AddOutcome::Incremented;
        }

        self.items.push(CartItem::new(item.clone(), restaurant));
        if replaced {
            AddOutcome::Replaced
        } else {
            AddOutcome::Added
        }
    }

    /// Apply a +/- delta; lines reaching zero are removed
    pub fn update_quantity(&mut self, item_id: &str, delta: i32) {
        for line in self.items.iter_mut().filter(|i| i.item.id == item_id) {
            line.quantity = line.quantity.saturating_add_signed(delta);
        }
        self.items.retain(|i| i.quantity > 0);
    }

    pub fn remove(&mut self, item_id: &str) {
        self.items.retain(|i| i.item.id != item_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Totals for the chosen order type and the store's delivery fee
    pub fn totals(&self, order_type: OrderType, delivery_fee: f64) -> CartTotals {
        money::calculate_totals(&self.items, order_type, delivery_fee)
    }

    /// Snapshot of the lines for an order
    pub fn snapshot(&self) -> Vec<CartItem> {
        self.items.clone()
    }
}
