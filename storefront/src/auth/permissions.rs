//! Permission Definitions
//!
//! Each role gets a fixed permission list. Scoping to a single restaurant
//! (managers) or a set of restaurants (couriers) is applied on top of these
//! lists by [`super::gate`].

use shared::models::UserRole;
use shared::types::Permission;

// === 商户 ===
pub const RESTAURANTS_CREATE: &str = "restaurants:create";
pub const RESTAURANTS_UPDATE: &str = "restaurants:update";
pub const RESTAURANTS_DELETE: &str = "restaurants:delete";
/// 配送费只有管理员能改
pub const RESTAURANTS_SET_DELIVERY_FEE: &str = "restaurants:set_delivery_fee";
pub const MENU_MANAGE: &str = "menu:manage";

// === 平台 ===
pub const USERS_MANAGE: &str = "users:manage";
pub const CATEGORIES_MANAGE: &str = "categories:manage";
pub const SETTINGS_MANAGE: &str = "settings:manage";

// === 订单 ===
pub const ORDERS_CREATE: &str = "orders:create";
pub const ORDERS_VIEW: &str = "orders:view";
/// accept / ready / hand over pickup / cancel
pub const ORDERS_MANAGE: &str = "orders:manage";
pub const ORDERS_CLAIM: &str = "orders:claim";
pub const ORDERS_DELIVER: &str = "orders:deliver";

// === 个人 ===
pub const ADDRESSES_MANAGE: &str = "addresses:manage";
pub const PROFILE_UPDATE: &str = "profile:update";

pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["*"];

/// 店长：只管自己的店
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    RESTAURANTS_UPDATE,
    MENU_MANAGE,
    ORDERS_VIEW,
    ORDERS_MANAGE,
    PROFILE_UPDATE,
];

pub const DEFAULT_COURIER_PERMISSIONS: &[&str] = &[
    ORDERS_VIEW,
    ORDERS_CLAIM,
    ORDERS_DELIVER,
    PROFILE_UPDATE,
];

pub const DEFAULT_CUSTOMER_PERMISSIONS: &[&str] = &[
    ORDERS_CREATE,
    ORDERS_VIEW,
    ADDRESSES_MANAGE,
    PROFILE_UPDATE,
];

/// 未登录访客只能下单
pub const GUEST_PERMISSIONS: &[&str] = &[ORDERS_CREATE];

/// Get permissions for a role
pub fn for_role(role: UserRole) -> Vec<Permission> {
    let list = match role {
        UserRole::Admin => DEFAULT_ADMIN_PERMISSIONS,
        UserRole::Manager => DEFAULT_MANAGER_PERMISSIONS,
        UserRole::Courier => DEFAULT_COURIER_PERMISSIONS,
        UserRole::Customer => DEFAULT_CUSTOMER_PERMISSIONS,
    };
    list.iter().map(|s| Permission::new(*s)).collect()
}

/// Whether an anonymous visitor may perform the action
pub fn guest_allows(action: &str) -> bool {
    GUEST_PERMISSIONS.contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grants(role: UserRole, action: &str) -> bool {
        for_role(role).iter().any(|p| p.grants(action))
    }

    #[test]
    fn test_admin_has_everything() {
        assert!(grants(UserRole::Admin, RESTAURANTS_CREATE));
        assert!(grants(UserRole::Admin, RESTAURANTS_SET_DELIVERY_FEE));
        assert!(grants(UserRole::Admin, SETTINGS_MANAGE));
    }

    #[test]
    fn test_manager_cannot_touch_platform() {
        assert!(grants(UserRole::Manager, RESTAURANTS_UPDATE));
        assert!(!grants(UserRole::Manager, RESTAURANTS_CREATE));
        assert!(!grants(UserRole::Manager, RESTAURANTS_DELETE));
        assert!(!grants(UserRole::Manager, RESTAURANTS_SET_DELIVERY_FEE));
        assert!(!grants(UserRole::Manager, USERS_MANAGE));
        assert!(!grants(UserRole::Manager, CATEGORIES_MANAGE));
        assert!(!grants(UserRole::Manager, SETTINGS_MANAGE));
    }

    #[test]
    fn test_courier_and_customer() {
        assert!(grants(UserRole::Courier, ORDERS_CLAIM));
        assert!(!grants(UserRole::Courier, ORDERS_MANAGE));
        assert!(grants(UserRole::Customer, ADDRESSES_MANAGE));
        assert!(!grants(UserRole::Customer, ORDERS_CLAIM));
        assert!(guest_allows(ORDERS_CREATE));
        assert!(!guest_allows(ORDERS_VIEW));
    }
}
