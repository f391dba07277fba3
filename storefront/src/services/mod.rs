//! 服务层 - 店面业务操作
//!
//! # 服务列表
//!
//! - [`catalog`] - 首页列表、菜单、徽章
//! - [`accounts`] - 注册、登录、会话、地址簿
//! - [`checkout`] - 下单校验和订单快照
//! - [`dashboards`] - 店铺 / 骑手 / 顾客看板
//! - [`admin`] - 店铺、菜单、用户、分类、全局设置
//! - [`handoff`] - 小票文本和 WhatsApp 链接
//! - [`assistant`] - 聊天助手
//!
//! Stateful operations are methods on [`crate::core::StorefrontState`];
//! the pure pieces are free functions next to them.

pub mod accounts;
pub mod admin;
pub mod assistant;
pub mod catalog;
pub mod checkout;
pub mod dashboards;
pub mod handoff;

pub use accounts::ProfileUpdate;
pub use assistant::{ChatAssistant, ChatRole, ChatTurn, GeminiAssistant, OfflineAssistant};
pub use catalog::RestaurantCard;
pub use dashboards::{ActionButton, CourierDashboard, OrderEntry, StoreDashboard};
