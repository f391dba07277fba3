use std::path::PathBuf;

use chrono_tz::Tz;

use crate::utils::time;

/// 店面配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库文件、日志) |
/// | DATABASE_FILE | storefront.redb | 数据库文件名 |
/// | BUSINESS_TIMEZONE | America/Fortaleza | 营业时间所在时区 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志目录，存在时写入按天滚动的文件 |
/// | ASSISTANT_API_KEY | (未设置) | 聊天助手密钥，未设置时助手离线 |
/// | ASSISTANT_MODEL | gemini-3-flash-preview | 模型名称 |
/// | ASSISTANT_BASE_URL | https://generativelanguage.googleapis.com | 接口地址 |
/// | ASSISTANT_TIMEOUT_MS | 15000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/volpony LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 数据库文件名 (相对于 work_dir)
    pub database_file: String,
    /// 业务时区
    pub timezone: Tz,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub assistant: AssistantConfig,
}

/// 聊天助手配置
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("ASSISTANT_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("ASSISTANT_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".into()),
            base_url: std::env::var("ASSISTANT_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            timeout_ms: std::env::var("ASSISTANT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(15000),
        }
    }

    /// 是否配置了密钥
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            database_file: std::env::var("DATABASE_FILE")
                .unwrap_or_else(|_| "storefront.redb".into()),
            timezone: time::parse_timezone(
                &std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "America/Fortaleza".into()),
            ),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            assistant: AssistantConfig::from_env(),
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 数据库文件完整路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.database_file)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_joins_work_dir() {
        let mut config = Config::with_work_dir("/tmp/volpony");
        config.database_file = "test.redb".into();
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/volpony/test.redb")
        );
    }

    #[test]
    fn test_environment_flags() {
        let mut config = Config::default();
        config.environment = "production".into();
        assert!(config.is_production());
        assert!(!config.is_development());
    }
}
