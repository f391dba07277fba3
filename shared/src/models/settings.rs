//! Global Settings Model

use super::category::Category;
use serde::{Deserialize, Serialize};

/// How platform fees are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    #[default]
    Fixed,
    Percentage,
}

/// Process-wide settings singleton, replaced wholesale on save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub site_fee: f64,
    pub app_fee: f64,
    /// Minimum subtotal for checkout, 0 disables the check
    pub min_order_value: f64,
    #[serde(default)]
    pub fee_type: FeeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl GlobalSettings {
    pub fn categories(&self) -> &[Category] {
        self.categories.as_deref().unwrap_or(&[])
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories().iter().find(|c| c.id == id)
    }
}
