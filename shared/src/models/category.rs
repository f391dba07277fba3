//! Category Model

use serde::{Deserialize, Serialize};

/// Sentinel category id meaning "no filter"
pub const ALL_CATEGORY_ID: &str = "all";

/// Category id used by ride-hailing establishments
pub const TAXI_CATEGORY_ID: &str = "taxi";

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Emoji shown next to the name
    pub icon: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
        }
    }

    /// The `all` sentinel can never be edited or deleted
    pub fn is_sentinel(&self) -> bool {
        self.id == ALL_CATEGORY_ID
    }
}

/// Create / edit category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub icon: String,
}
