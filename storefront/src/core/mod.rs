//! 核心模块 - 配置、共享状态和会话状态
//!
//! # 模块结构
//!
//! - [`Config`] - 店面配置
//! - [`StorefrontState`] - 存储、缓存、订单管理和聊天助手
//! - [`AppState`] / [`reduce`] - 单个客户端的会话状态

pub mod config;
pub mod state;
pub mod view;

pub use config::{AssistantConfig, Config};
pub use state::{Snapshot, StorefrontState};
pub use view::{AppAction, AppState, AppView, reduce};
