//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "http://localhost:5000/translate";
    pub const DEFAULT_SOURCE_LANG: &str = "en";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_ALTERNATIVES: usize = 1;
    pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

    // 从右向左书写的目标语言
    pub const RTL_LANGUAGES: &[&str] = &["ar", "fa", "he", "ur"];

    // 存储路径
    pub const DEFAULT_CACHE_PATH: &str = "translations.json";
    pub const DEFAULT_LANGUAGES_PATH: &str = "languages.json";
    pub const DEFAULT_TEXT_LOG_PATH: &str = "logs/texts.log";

    // 缓存工作线程的命令队列容量
    pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "civiclens-translate.toml",
        ".civiclens-translate.toml",
        "~/.config/civiclens/translate.toml",
        "/etc/civiclens/translate.toml",
    ];
}
