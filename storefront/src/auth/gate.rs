//! Role / visibility gate
//!
//! Every dashboard and service asks this module what a viewer may see or
//! change instead of re-deriving role checks at the call site.
//!
//! | Role | Restaurants | Orders | Users / categories / settings |
//! |------|-------------|--------|-------------------------------|
//! | admin | all, read-write | all, read-write | read-write |
//! | manager | own store, read-write (fee locked) | own store, read-write | own profile |
//! | courier | public | linked stores, available + own in-flight, read-only | own profile |
//! | customer | public | own orders, read-only | own profile + addresses |

use shared::models::{Restaurant, User};
use shared::{AppError, AppResult, ErrorCode, Order};

use super::CurrentUser;
use super::permissions;
use crate::orders::lifecycle;

/// 访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Hidden,
    ReadOnly,
    ReadWrite,
}

impl Access {
    pub fn can_read(&self) -> bool {
        *self >= Access::ReadOnly
    }

    pub fn can_write(&self) -> bool {
        *self == Access::ReadWrite
    }
}

// ========== 记录级判定 ==========

pub fn restaurant_access(viewer: Option<&CurrentUser>, restaurant: &Restaurant) -> Access {
    match viewer {
        Some(u) if u.is_admin() => Access::ReadWrite,
        Some(u) if u.is_manager() && u.manages_restaurant(&restaurant.id) => Access::ReadWrite,
        _ => Access::ReadOnly,
    }
}

pub fn order_access(viewer: Option<&CurrentUser>, order: &Order) -> Access {
    let Some(u) = viewer else {
        return Access::Hidden;
    };
    if u.is_admin() {
        return Access::ReadWrite;
    }
    if u.is_manager() {
        return if u.manages_restaurant(&order.restaurant_id) {
            Access::ReadWrite
        } else {
            Access::Hidden
        };
    }
    if u.is_courier() {
        return if is_available_to(u, order) || is_active_for(u, order) {
            Access::ReadOnly
        } else {
            Access::Hidden
        };
    }
    if order.customer_id == u.id {
        Access::ReadOnly
    } else {
        Access::Hidden
    }
}

pub fn user_access(viewer: Option<&CurrentUser>, user: &User) -> Access {
    match viewer {
        Some(u) if u.is_admin() => Access::ReadWrite,
        Some(u) if u.id == user.id => Access::ReadWrite,
        _ => Access::Hidden,
    }
}

/// 配送费输入框对店长禁用
pub fn can_change_delivery_fee(viewer: Option<&CurrentUser>) -> bool {
    viewer.is_some_and(|u| u.has_permission(permissions::RESTAURANTS_SET_DELIVERY_FEE))
}

// ========== 集合过滤 ==========

/// Orders the viewer may see, in input order
pub fn visible_orders<'a>(viewer: Option<&CurrentUser>, orders: &'a [Order]) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| order_access(viewer, o).can_read())
        .collect()
}

/// Restaurants shown in the management panel (admin: all, manager: own)
pub fn managed_restaurants<'a>(
    viewer: Option<&CurrentUser>,
    restaurants: &'a [Restaurant],
) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| restaurant_access(viewer, r).can_write())
        .collect()
}

// ========== Courier board ==========

/// Unclaimed order from a linked store in a claimable state
pub fn is_available_to(courier: &CurrentUser, order: &Order) -> bool {
    courier.is_courier()
        && courier.serves_restaurant(&order.restaurant_id)
        && lifecycle::is_claimable(order)
}

/// Claimed by this courier and still on the road
pub fn is_active_for(courier: &CurrentUser, order: &Order) -> bool {
    order.is_assigned_to(&courier.id) && order.status.is_in_flight()
}

/// 骑手看板
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourierBoard {
    pub available: Vec<Order>,
    pub active: Vec<Order>,
}

impl CourierBoard {
    /// Split orders into the two courier lists, newest first
    pub fn build(courier: &CurrentUser, orders: &[Order]) -> Self {
        let mut board = Self::default();
        for order in orders {
            if is_active_for(courier, order) {
                board.active.push(order.clone());
            } else if is_available_to(courier, order) {
                board.available.push(order.clone());
            }
        }
        board.available.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        board.active.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        board
    }
}

// ========== Guards ==========

/// Signed-in user or `NotAuthenticated`
pub fn require_user(viewer: Option<&CurrentUser>) -> AppResult<&CurrentUser> {
    viewer.ok_or_else(AppError::not_authenticated)
}

/// Permission check that also covers anonymous visitors
pub fn require_permission(viewer: Option<&CurrentUser>, action: &str) -> AppResult<()> {
    let allowed = match viewer {
        Some(u) => u.has_permission(action),
        None => permissions::guest_allows(action),
    };
    if allowed {
        return Ok(());
    }
    match viewer {
        None => Err(AppError::not_authenticated()),
        Some(u) if action_is_admin_only(action) => Err(AppError::admin_required()
            .with_detail("role", u.role.as_str())
            .with_detail("action", action)),
        Some(u) => Err(AppError::permission_denied(format!(
            "Role '{}' cannot perform '{}'",
            u.role, action
        ))
        .with_detail("action", action)),
    }
}

/// Admins pass; managers only for their own store
pub fn require_restaurant_scope(user: &CurrentUser, restaurant_id: &str) -> AppResult<()> {
    if user.is_admin() || (user.is_manager() && user.manages_restaurant(restaurant_id)) {
        return Ok(());
    }
    Err(AppError::new(ErrorCode::RestaurantScopeRequired).with_detail("restaurantId", restaurant_id))
}

fn action_is_admin_only(action: &str) -> bool {
    [
        permissions::RESTAURANTS_CREATE,
        permissions::RESTAURANTS_DELETE,
        permissions::RESTAURANTS_SET_DELIVERY_FEE,
        permissions::USERS_MANAGE,
        permissions::CATEGORIES_MANAGE,
        permissions::SETTINGS_MANAGE,
    ]
    .contains(&action)
}
