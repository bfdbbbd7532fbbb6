//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。
//!
//! 错误分为三类传播策略：
//! - 存储错误（缓存文件损坏、不可读写）对当前操作是致命的，绝不回退到空缓存
//! - 后端错误仅影响单个（文本, 语言）对，批处理会记录后跳过
//! - 输入错误直接返回给调用方，不做重试

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 缓存存储错误：持久化数据不可读、格式错误或写入失败
    #[error("缓存存储错误: {0}")]
    StorageError(String),

    /// 参考数据文件不存在
    #[error("文件不存在: {0}")]
    NotFound(String),

    /// 翻译后端错误：非成功状态码、超时或响应缺少译文
    #[error("翻译后端错误: {0}")]
    BackendError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InputError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    ///
    /// 组件本身从不自动重试，该标记仅供调用方（例如重跑批处理）参考。
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::BackendError(_) => true,
            TranslationError::StorageError(_) => false,
            TranslationError::NotFound(_) => false,
            TranslationError::InputError(_) => false,
            TranslationError::ConfigError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::StorageError(_) => ErrorSeverity::Critical,
            TranslationError::NotFound(_) => ErrorSeverity::Error,
            TranslationError::BackendError(_) => ErrorSeverity::Warning,
            TranslationError::InputError(_) => ErrorSeverity::Info,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::StorageError(_) => ErrorCategory::Storage,
            TranslationError::NotFound(_) => ErrorCategory::Storage,
            TranslationError::BackendError(_) => ErrorCategory::Backend,
            TranslationError::InputError(_) => ErrorCategory::Input,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
        }
    }

    /// 对外接口使用的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            TranslationError::InputError(_) => 400,
            TranslationError::NotFound(_) => 404,
            TranslationError::BackendError(_) => 502,
            TranslationError::StorageError(_) => 500,
            TranslationError::ConfigError(_) => 500,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        match self {
            TranslationError::StorageError(msg) => {
                TranslationError::StorageError(format!("{} (上下文: {})", msg, context))
            }
            TranslationError::NotFound(msg) => {
                TranslationError::NotFound(format!("{} (上下文: {})", msg, context))
            }
            TranslationError::BackendError(msg) => {
                TranslationError::BackendError(format!("{} (上下文: {})", msg, context))
            }
            TranslationError::InputError(msg) => {
                TranslationError::InputError(format!("{} (上下文: {})", msg, context))
            }
            TranslationError::ConfigError(msg) => {
                TranslationError::ConfigError(format!("{} (上下文: {})", msg, context))
            }
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Storage,
    Backend,
    Input,
    Configuration,
}

/// 标准错误转换
///
/// 本 crate 中的 IO 只发生在缓存、语言列表和文本日志上，统一归为存储错误。
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::StorageError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::StorageError(format!("JSON格式错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::BackendError(format!("请求超时: {}", error))
        } else if error.is_decode() {
            TranslationError::BackendError(format!("响应解析失败: {}", error))
        } else {
            TranslationError::BackendError(format!("网络错误: {}", error))
        }
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::BackendError(format!("异步操作超时: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误统计信息
#[derive(Debug, Clone, Default)]
pub struct ErrorStats {
    pub total_errors: usize,
    pub by_category: HashMap<ErrorCategory, usize>,
    pub by_severity: HashMap<ErrorSeverity, usize>,
    pub retryable_errors: usize,
    pub critical_errors: usize,
}

impl ErrorStats {
    /// 记录错误
    pub fn record_error(&mut self, error: &TranslationError) {
        self.total_errors += 1;

        let category = error.category();
        *self.by_category.entry(category).or_insert(0) += 1;

        let severity = error.severity();
        *self.by_severity.entry(severity).or_insert(0) += 1;

        if error.is_retryable() {
            self.retryable_errors += 1;
        }

        if severity == ErrorSeverity::Critical {
            self.critical_errors += 1;
        }
    }

    /// 某一类别的错误数
    pub fn count(&self, category: ErrorCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}
