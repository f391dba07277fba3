//! Volpony Storefront - 外卖 / 网约车店面核心
//!
//! # 架构概述
//!
//! Customers browse restaurants, fill a single-store cart and confirm an
//! order that is handed off to the store by a WhatsApp deep-link. Store
//! managers and couriers advance orders through a role-gated status
//! machine; administrators curate restaurants, menus, categories and users.
//!
//! # 模块结构
//!
//! ```text
//! storefront/src/
//! ├── core/          # 配置、共享状态、会话 reducer
//! ├── auth/          # 当前用户、权限、可见性判定
//! ├── orders/        # 状态机、显示标签、金额、CAS 管理器
//! ├── services/      # 目录、账户、结账、看板、管理、转发、助手
//! ├── db/            # 存储接口 + redb 实现 + 初始数据
//! ├── utils/         # 日志、时间、校验
//! ├── cart.rs        # 购物车
//! └── hours.rs       # 营业时间
//! ```

pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod hours;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use cart::{AddOutcome, Cart, ConflictResolution};
pub use self::core::{AppAction, AppState, AppView, Config, StorefrontState, reduce};
pub use db::{RedbStore, StorefrontStore};
pub use orders::{OrderAction, OrdersManager};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 环境准备: .env、配置、日志
///
/// Creates `LOG_DIR` when it is set so the rolling file appender has a
/// place to write.
pub fn setup_environment() -> std::io::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();

    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
 _   __     __
| | / /__  / /__  ___  ___  __ __
| |/ / _ \/ / _ \/ _ \/ _ \/ // /
|___/\___/_/ .__/\___/_//_/\_, /
          /_/             /___/
    "#
    );
}
