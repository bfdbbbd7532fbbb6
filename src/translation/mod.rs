//! 翻译模块
//!
//! 为界面文本提供带持久化缓存的机器翻译：
//! - **core**: 翻译服务、后端抽象和缓存工作线程
//! - **pipeline**: 前缀拆分与批量翻译
//! - **storage**: 翻译缓存、语言列表和文本收集日志
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use civiclens_translate::translation::{TranslationConfig, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::from_config(TranslationConfig::default())?;
//! let translated = service.translate("fr", "¡Hello world").await?;
//! println!("{}", translated);
//! # Ok(())
//! # }
//! ```

/// 配置管理模块
pub mod config;

/// 核心翻译模块 - 翻译服务、后端和缓存工作线程
pub mod core;

/// 错误处理模块
pub mod error;

/// 文本处理管道模块 - 前缀拆分和批量翻译
pub mod pipeline;

/// 存储管理模块 - 缓存、语言列表和文本日志
pub mod storage;

// 核心服务
pub use self::core::{
    BackendRequest, BackendResponse, CacheHandle, LibreTranslateBackend, ServiceStats,
    ServiceStatsSnapshot, TranslationBackend, TranslationService,
};

// 配置
pub use config::{ConfigManager, TranslationConfig};

// 错误处理
pub use error::{ErrorCategory, ErrorSeverity, ErrorStats, TranslationError, TranslationResult};

// 管道
pub use pipeline::{split_prefix, BatchOutcome, BatchReport, BatchRunner, SplitRule};

// 存储
pub use storage::{CacheStats, LanguageCatalog, Pipeline, TextLog, TranslationCache};
