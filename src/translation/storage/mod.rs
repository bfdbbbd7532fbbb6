//! 存储模块
//!
//! 提供翻译缓存、语言参考数据和文本收集日志。

pub mod cache;
pub mod languages;
pub mod text_log;

pub use cache::{CacheEntries, CacheStats, Pipeline, TranslationCache};
pub use languages::{Direction, LanguageCatalog, LanguageDescriptor};
pub use text_log::{normalize_line, read_source_log, TextLog};
