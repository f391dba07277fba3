//! Fixtures shared by order and gate tests

use shared::models::{MenuItem, UserRole};
use shared::order::{CartItem, CustomerAddress, OrderStatus, OrderType, ServiceKind};
use shared::Order;

use crate::auth::CurrentUser;

pub fn user(id: &str, role: UserRole) -> CurrentUser {
    CurrentUser {
        id: id.into(),
        name: id.into(),
        role,
        restaurant_id: None,
        courier_restaurant_ids: vec![],
    }
}

pub fn admin() -> CurrentUser {
    user("admin1", UserRole::Admin)
}

pub fn customer(id: &str) -> CurrentUser {
    user(id, UserRole::Customer)
}

pub fn manager_of(restaurant_id: &str) -> CurrentUser {
    CurrentUser {
        restaurant_id: Some(restaurant_id.into()),
        ..user("m1", UserRole::Manager)
    }
}

pub fn courier_of(id: &str, restaurant_ids: &[&str]) -> CurrentUser {
    CurrentUser {
        courier_restaurant_ids: restaurant_ids.iter().map(|s| s.to_string()).collect(),
        ..user(id, UserRole::Courier)
    }
}

pub fn menu_item(id: &str, price: f64) -> MenuItem {
    MenuItem {
        id: id.into(),
        name: format!("Item {}", id),
        description: String::new(),
        price,
        image: String::new(),
        popular: None,
        active: None,
    }
}

/// Delivery food order for customer `u1`
pub fn order_fixture(id: &str, restaurant_id: &str, status: OrderStatus) -> Order {
    Order {
        id: id.into(),
        customer_name: "Ana".into(),
        customer_address: CustomerAddress::Pickup,
        items: vec![CartItem {
            item: menu_item("b1", 25.0),
            quantity: 1,
            restaurant_id: restaurant_id.into(),
            restaurant_name: "Volpony Burguer".into(),
        }],
        total: 30.0,
        delivery_fee: 5.0,
        timestamp: 1,
        restaurant_id: restaurant_id.into(),
        restaurant_name: "Volpony Burguer".into(),
        order_type: OrderType::Delivery,
        payment_method: "PIX".into(),
        status,
        customer_id: "u1".into(),
        courier_id: None,
        courier_name: None,
        delivery_distance: None,
        service: ServiceKind::Food,
    }
}
