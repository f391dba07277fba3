//! 认证与权限
//!
//! - [`CurrentUser`]: identity of the signed-in actor, derived from a [`User`]
//! - [`permissions`]: role → permission lists
//! - [`gate`]: the single place that decides what a viewer may see or change

pub mod gate;
pub mod permissions;

use shared::models::{User, UserRole};
use shared::types::Permission;

pub use gate::{Access, CourierBoard};

/// 当前登录用户
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    /// Store managed by a manager
    pub restaurant_id: Option<String>,
    /// Stores served by a courier
    pub courier_restaurant_ids: Vec<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }

    pub fn is_courier(&self) -> bool {
        self.role == UserRole::Courier
    }

    pub fn serves_restaurant(&self, restaurant_id: &str) -> bool {
        self.courier_restaurant_ids.iter().any(|id| id == restaurant_id)
    }

    pub fn manages_restaurant(&self, restaurant_id: &str) -> bool {
        self.restaurant_id.as_deref() == Some(restaurant_id)
    }

    pub fn permissions(&self) -> Vec<Permission> {
        permissions::for_role(self.role)
    }

    /// 检查权限
    pub fn has_permission(&self, action: &str) -> bool {
        self.permissions().iter().any(|p| p.grants(action))
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            restaurant_id: user.restaurant_id.clone(),
            courier_restaurant_ids: user.courier_restaurant_ids().to_vec(),
        }
    }
}
