//! Data models
//!
//! Records persisted by the storefront store and rendered by front ends.
//! Field names serialize as camelCase so stored JSON stays readable by
//! browser clients. All IDs are strings.

pub mod address;
pub mod category;
pub mod menu_item;
pub mod restaurant;
pub mod settings;
pub mod user;

// Re-exports
pub use address::*;
pub use category::*;
pub use menu_item::*;
pub use restaurant::*;
pub use settings::*;
pub use user::*;
