use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use shared::models::{GlobalSettings, Restaurant, User};

use crate::core::Config;
use crate::db::{RedbStore, StorefrontStore};
use crate::orders::OrdersManager;
use crate::services::assistant::{self, ChatAssistant};
use crate::utils::time;
use crate::utils::{AppError, AppResult};

/// Settings, users and restaurants as last loaded or saved
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub settings: GlobalSettings,
    pub users: Vec<User>,
    pub restaurants: Vec<Restaurant>,
}

/// 店面状态 - 持有所有服务的共享引用
///
/// Cloning is cheap: every field is shared behind an `Arc`.
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | store | 存储后端 |
/// | snapshot | 内存缓存, 保存成功后才替换 |
/// | orders | 订单状态机 + compare-and-set |
/// | assistant | 聊天助手 |
#[derive(Clone)]
pub struct StorefrontState {
    pub config: Config,
    store: Arc<dyn StorefrontStore>,
    snapshot: Arc<RwLock<Snapshot>>,
    pub orders: OrdersManager,
    assistant: Arc<dyn ChatAssistant>,
}

impl StorefrontState {
    /// 初始化
    ///
    /// 1. 打开 work_dir 下的数据库
    /// 2. 根据配置选择聊天助手
    /// 3. 加载缓存
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let path = config.database_path();
        let store = RedbStore::open(&path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to open store");
            AppError::from(e)
        })?;
        let assistant: Arc<dyn ChatAssistant> = assistant::from_config(&config.assistant).into();
        Self::with_store(config.clone(), Arc::new(store), assistant).await
    }

    /// Build on an existing store (tests use the in-memory backend)
    pub async fn with_store(
        config: Config,
        store: Arc<dyn StorefrontStore>,
        assistant: Arc<dyn ChatAssistant>,
    ) -> AppResult<Self> {
        let snapshot = load_snapshot(store.as_ref()).await?;
        tracing::info!(
            restaurants = snapshot.restaurants.len(),
            users = snapshot.users.len(),
            "Storefront data loaded"
        );
        Ok(Self {
            config,
            orders: OrdersManager::new(store.clone()),
            store,
            snapshot: Arc::new(RwLock::new(snapshot)),
            assistant,
        })
    }

    /// Reload every collection from the store (manual refresh)
    pub async fn refresh(&self) -> AppResult<()> {
        let snapshot = load_snapshot(self.store.as_ref()).await?;
        *self.snapshot.write() = snapshot;
        Ok(())
    }

    pub fn store(&self) -> &Arc<dyn StorefrontStore> {
        &self.store
    }

    pub fn assistant(&self) -> &Arc<dyn ChatAssistant> {
        &self.assistant
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    pub fn settings(&self) -> GlobalSettings {
        self.snapshot.read().settings.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.snapshot.read().users.clone()
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.snapshot.read().restaurants.clone()
    }

    pub fn restaurant(&self, restaurant_id: &str) -> Option<Restaurant> {
        self.snapshot
            .read()
            .restaurants
            .iter()
            .find(|r| r.id == restaurant_id)
            .cloned()
    }

    pub fn user(&self, user_id: &str) -> Option<User> {
        self.snapshot
            .read()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }

    /// Local wall-clock time in the business timezone
    pub fn now(&self) -> NaiveDateTime {
        time::local_now(self.config.timezone)
    }

    /// Constant "online" flag
    pub fn cloud_status(&self) -> bool {
        self.store.cloud_status()
    }

    // ========== Write-through ==========
    //
    // Save first, then swap the cache. A failed save leaves memory untouched.

    pub(crate) async fn commit_settings(&self, settings: GlobalSettings) -> AppResult<()> {
        self.store.save_settings(&settings).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to save settings");
            AppError::from(e)
        })?;
        self.snapshot.write().settings = settings;
        Ok(())
    }

    pub(crate) async fn commit_users(&self, users: Vec<User>) -> AppResult<()> {
        self.store.save_users(&users).await.map_err(|e| {
            tracing::error!(count = users.len(), error = %e, "Failed to save users");
            AppError::from(e)
        })?;
        self.snapshot.write().users = users;
        Ok(())
    }

    pub(crate) async fn commit_restaurants(&self, restaurants: Vec<Restaurant>) -> AppResult<()> {
        self.store.save_restaurants(&restaurants).await.map_err(|e| {
            tracing::error!(count = restaurants.len(), error = %e, "Failed to save restaurants");
            AppError::from(e)
        })?;
        self.snapshot.write().restaurants = restaurants;
        Ok(())
    }
}

impl std::fmt::Debug for StorefrontState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn load_snapshot(store: &dyn StorefrontStore) -> AppResult<Snapshot> {
    let (settings, users, restaurants) = tokio::try_join!(
        store.get_settings(),
        store.get_users(),
        store.get_restaurants(),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to load storefront data");
        AppError::from(e)
    })?;
    Ok(Snapshot {
        settings,
        users,
        restaurants,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{memory_state, read_only_state};
    use crate::orders::test_support::admin;
    use shared::ErrorCode;
    use shared::models::RegisterInput;

    #[tokio::test]
    async fn test_loads_seed_data() {
        let state = memory_state().await;
        assert_eq!(state.restaurants().len(), 1);
        assert!(state.restaurant("1").is_some());
        assert!(state.user("admin1").is_some());
        assert!(state.settings().categories().iter().any(|c| c.id == "all"));
        assert!(state.cloud_status());
    }

    #[tokio::test]
    async fn test_commit_replaces_cache() {
        let state = memory_state().await;
        let mut restaurants = state.restaurants();
        restaurants[0].name = "Volpony Burguer 2".into();
        state.commit_restaurants(restaurants).await.unwrap();

        let stored = state.store().get_restaurants().await.unwrap();
        assert_eq!(stored[0].name, "Volpony Burguer 2");
        state.refresh().await.unwrap();
        assert_eq!(state.restaurants()[0].name, "Volpony Burguer 2");
    }

    #[tokio::test]
    async fn test_failed_save_leaves_cache_untouched() {
        let state = read_only_state().await;
        let before = state.snapshot();

        let err = state
            .register(RegisterInput {
                name: "Ana".into(),
                username: "ana".into(),
                password: "segredo".into(),
                whatsapp_number: "5588999990000".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(state.users(), before.users);
        // 注册失败不写会话
        assert!(state.store().get_session().await.unwrap().is_none());

        let mut restaurant = state.restaurant("1").unwrap();
        restaurant.name = "Outro Nome".into();
        let err = state
            .save_restaurant(Some(&admin()), restaurant, false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(state.restaurants(), before.restaurants);

        let mut settings = state.settings();
        settings.min_order_value = 20.0;
        let err = state.save_settings(Some(&admin()), settings).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(state.settings(), before.settings);
    }
}
