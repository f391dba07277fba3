//! 数据存储层
//!
//! [`StorefrontStore`] is the keyed-record collaborator the storefront core
//! talks to. Collections (settings, users, restaurants) are saved wholesale;
//! orders are stored one record per id so a courier claim can be written
//! with a compare-and-set.
//!
//! [`RedbStore`] is the embedded implementation. A networked backend can
//! replace it without touching the services as long as
//! [`StorefrontStore::compare_and_swap_order`] stays atomic.

pub mod error;
pub mod redb_store;
pub mod seed;

use async_trait::async_trait;
use shared::models::{GlobalSettings, Restaurant, User};
use shared::Order;

pub use error::{StorageError, StorageResult};
pub use redb_store::RedbStore;

#[async_trait]
pub trait StorefrontStore: Send + Sync {
    /// Settings singleton, seed defaults when nothing was saved yet
    async fn get_settings(&self) -> StorageResult<GlobalSettings>;
    async fn save_settings(&self, settings: &GlobalSettings) -> StorageResult<()>;

    /// All users, seed admin when nothing was saved yet
    async fn get_users(&self) -> StorageResult<Vec<User>>;
    async fn save_users(&self, users: &[User]) -> StorageResult<()>;

    /// All restaurants, seed restaurant when nothing was saved yet
    async fn get_restaurants(&self) -> StorageResult<Vec<Restaurant>>;
    async fn save_restaurants(&self, restaurants: &[Restaurant]) -> StorageResult<()>;

    async fn get_orders(&self) -> StorageResult<Vec<Order>>;
    async fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>>;
    /// Fails with [`StorageError::DuplicateOrder`] when the id is taken
    async fn insert_order(&self, order: &Order) -> StorageResult<()>;
    /// Replace `expected` with `next` only if the stored record still equals
    /// `expected`. Returns `false` when someone else changed it first.
    async fn compare_and_swap_order(&self, expected: &Order, next: &Order) -> StorageResult<bool>;

    /// Cached record of the signed-in user
    async fn get_session(&self) -> StorageResult<Option<User>>;
    async fn save_session(&self, user: &User) -> StorageResult<()>;
    async fn clear_session(&self) -> StorageResult<()>;

    /// Liveness flag for the UI badge
    fn cloud_status(&self) -> bool {
        true
    }
}
