//! redb-based storefront store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `kv` | collection key | JSON | settings / users / restaurants / session |
//! | `orders` | order id | JSON `Order` | one record per order |
//!
//! # Concurrency
//!
//! redb serializes write transactions, so the read-compare-write inside
//! [`RedbStore::compare_and_swap_order`] is atomic: of two couriers racing
//! for the same order exactly one swap succeeds.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{GlobalSettings, Restaurant, User};
use shared::Order;

use super::error::{StorageError, StorageResult};
use super::{StorefrontStore, seed};

/// Table for whole collections: key = collection name, value = JSON
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Table for orders: key = order id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

const SETTINGS_KEY: &str = "volpony_settings";
const USERS_KEY: &str = "volpony_users";
const RESTAURANTS_KEY: &str = "volpony_restaurants";
const SESSION_KEY: &str = "volpony_session";

/// Storefront store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable once `commit()` returns, so a crash never
    /// leaves a half-written collection behind.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(KV_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== KV Operations ==========

    fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        let value = match table.get(key)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };
        Ok(value)
    }

    fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl StorefrontStore for RedbStore {
    async fn get_settings(&self) -> StorageResult<GlobalSettings> {
        Ok(self.load(SETTINGS_KEY)?.unwrap_or_else(seed::default_settings))
    }

    async fn save_settings(&self, settings: &GlobalSettings) -> StorageResult<()> {
        self.store(SETTINGS_KEY, settings)
    }

    async fn get_users(&self) -> StorageResult<Vec<User>> {
        Ok(self.load(USERS_KEY)?.unwrap_or_else(seed::default_users))
    }

    async fn save_users(&self, users: &[User]) -> StorageResult<()> {
        self.store(USERS_KEY, users)
    }

    async fn get_restaurants(&self) -> StorageResult<Vec<Restaurant>> {
        Ok(self
            .load(RESTAURANTS_KEY)?
            .unwrap_or_else(seed::default_restaurants))
    }

    async fn save_restaurants(&self, restaurants: &[Restaurant]) -> StorageResult<()> {
        self.store(RESTAURANTS_KEY, restaurants)
    }

    async fn get_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (_key, value) = entry?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }
        Ok(orders)
    }

    async fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let order = match table.get(order_id)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };
        Ok(order)
    }

    async fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let write_txn = self.db.begin_write()?;
        let exists = {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            let exists = table.get(order.id.as_str())?.is_some();
            if !exists {
                table.insert(order.id.as_str(), bytes.as_slice())?;
            }
            exists
        };
        if exists {
            write_txn.abort()?;
            return Err(StorageError::DuplicateOrder(order.id.clone()));
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn compare_and_swap_order(&self, expected: &Order, next: &Order) -> StorageResult<bool> {
        if expected.id != next.id {
            return Ok(false);
        }
        let bytes = serde_json::to_vec(next)?;
        let write_txn = self.db.begin_write()?;
        let swapped = {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            let current: Option<Order> = match table.get(expected.id.as_str())? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            if current.as_ref() == Some(expected) {
                table.insert(next.id.as_str(), bytes.as_slice())?;
                true
            } else {
                false
            }
        };
        if swapped {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(swapped)
    }

    async fn get_session(&self) -> StorageResult<Option<User>> {
        self.load(SESSION_KEY)
    }

    async fn save_session(&self, user: &User) -> StorageResult<()> {
        self.store(SESSION_KEY, user)
    }

    async fn clear_session(&self) -> StorageResult<()> {
        self.remove(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::test_support::order_fixture;
    use shared::order::OrderStatus;
    use shared::{AppError, ErrorCode};

    #[tokio::test]
    async fn test_seed_defaults_when_empty() {
        let store = RedbStore::open_in_memory().unwrap();
        let settings = store.get_settings().await.unwrap();
        assert_eq!(settings.categories().len(), 6);
        assert_eq!(settings.categories()[0].id, "all");

        let users = store.get_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "admin");

        let restaurants = store.get_restaurants().await.unwrap();
        assert_eq!(restaurants[0].name, "Volpony Burguer");
        assert_eq!(restaurants[0].menu.len(), 2);
        assert!(store.cloud_status());
    }

    #[tokio::test]
    async fn test_save_replaces_collection() {
        let store = RedbStore::open_in_memory().unwrap();
        store.save_restaurants(&[]).await.unwrap();
        // 保存过空列表后不再回退到种子数据
        assert!(store.get_restaurants().await.unwrap().is_empty());

        let mut settings = store.get_settings().await.unwrap();
        settings.min_order_value = 20.0;
        store.save_settings(&settings).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap().min_order_value, 20.0);
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = RedbStore::open_in_memory().unwrap();
        assert!(store.get_session().await.unwrap().is_none());
        let admin = store.get_users().await.unwrap().remove(0);
        store.save_session(&admin).await.unwrap();
        assert_eq!(store.get_session().await.unwrap(), Some(admin));
        store.clear_session().await.unwrap();
        assert!(store.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_order_rejects_duplicate_id() {
        let store = RedbStore::open_in_memory().unwrap();
        let order = order_fixture("ABC123", "1", OrderStatus::Pending);
        store.insert_order(&order).await.unwrap();
        let err = store.insert_order(&order).await.unwrap_err();
        assert!(matches!(err, StorageError::DuplicateOrder(id) if id == "ABC123"));
        assert_eq!(store.get_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let store = RedbStore::open_in_memory().unwrap();
        let ready = order_fixture("A1", "1", OrderStatus::Ready);
        store.insert_order(&ready).await.unwrap();

        let mut by_x = ready.clone();
        by_x.status = OrderStatus::HeadingToPickup;
        by_x.courier_id = Some("x".into());
        let mut by_y = ready.clone();
        by_y.status = OrderStatus::HeadingToPickup;
        by_y.courier_id = Some("y".into());

        assert!(store.compare_and_swap_order(&ready, &by_x).await.unwrap());
        // y 基于旧快照提交，必须失败
        assert!(!store.compare_and_swap_order(&ready, &by_y).await.unwrap());

        let stored = store.get_order("A1").await.unwrap().unwrap();
        assert_eq!(stored.courier_id.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_open_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store
                .insert_order(&order_fixture("A1", "1", OrderStatus::Pending))
                .await
                .unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert!(store.get_order("A1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_already_open_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.redb");
        let _first = RedbStore::open(&path).unwrap();
        let err = RedbStore::open(&path).err().unwrap();
        assert!(matches!(err, StorageError::Database(_)));
        assert_eq!(AppError::from(err).code, ErrorCode::StorageUnavailable);
    }
}
