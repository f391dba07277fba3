//! User Model

use super::address::Address;
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
    Manager,
    Courier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Customer => "customer",
            UserRole::Manager => "manager",
            UserRole::Courier => "courier",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account
///
/// Passwords are stored as entered; the storefront has no server side to
/// protect them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    /// Store managed by a manager
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    /// Stores a courier serves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_restaurant_ids: Option<Vec<String>>,
}

impl User {
    pub fn addresses(&self) -> &[Address] {
        self.addresses.as_deref().unwrap_or(&[])
    }

    pub fn courier_restaurant_ids(&self) -> &[String] {
        self.courier_restaurant_ids.as_deref().unwrap_or(&[])
    }

    pub fn serves_restaurant(&self, restaurant_id: &str) -> bool {
        self.courier_restaurant_ids()
            .iter()
            .any(|id| id == restaurant_id)
    }

    pub fn manages_restaurant(&self, restaurant_id: &str) -> bool {
        self.restaurant_id.as_deref() == Some(restaurant_id)
    }
}

/// Registration payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: String,
    pub username: String,
    pub password: String,
    pub whatsapp_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        let role: UserRole = serde_json::from_str("\"courier\"").unwrap();
        assert_eq!(role, UserRole::Courier);
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_relationships() {
        let user: User = serde_json::from_str(
            r#"{"id":"c1","name":"Zé","username":"ze","password":"x","role":"courier",
                "courierRestaurantIds":["1","2"]}"#,
        )
        .unwrap();
        assert!(user.serves_restaurant("2"));
        assert!(!user.serves_restaurant("3"));
        assert!(!user.manages_restaurant("1"));
        assert!(user.addresses().is_empty());
    }
}
