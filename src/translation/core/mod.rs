//! 翻译系统核心模块
//!
//! - **后端层** (`backend.rs`): 外部机器翻译服务的抽象与 HTTP 实现
//! - **工作线程** (`worker.rs`): 独占持久化缓存的单一所有者
//! - **服务层** (`service.rs`): 前缀拆分、缓存查询、后端调用与结果拼接
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── TranslationBackend (backend.rs)
//!     └── CacheHandle (worker.rs)
//!             └── TranslationCache (storage/cache.rs)
//! ```

pub mod backend;
pub mod service;
pub mod worker;

pub use backend::{BackendRequest, BackendResponse, LibreTranslateBackend, TranslationBackend};
pub use service::{ServiceStats, ServiceStatsSnapshot, TranslationService};
pub use worker::CacheHandle;
