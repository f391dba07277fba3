//! Address Model

use serde::{Deserialize, Serialize};

/// Delivery address owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    /// "Casa", "Trabalho", ...
    pub label: String,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    /// Conventional flag only, several addresses may carry it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl Address {
    /// Single-line form used on receipts and dashboards: `street, number - neighborhood`
    pub fn one_line(&self) -> String {
        format!("{}, {} - {}", self.street, self.number, self.neighborhood)
    }

    pub fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

/// New address payload (label and city fall back to defaults when blank)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub label: Option<String>,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: Option<String>,
    pub complement: Option<String>,
}
