//! # CivicLens Translate
//!
//! 界面文本的翻译缓存层：把不可翻译的前导符号与正文分开，只翻译正文，
//! 并把每个 `(流水线, 正文)` 的译文持久化，避免重复请求翻译后端。
//!
//! ## 模块组织
//!
//! - `env` - 环境变量定义
//! - `translation` - 翻译服务、缓存与批处理
//! - `web` - HTTP 服务（可选）

pub mod env;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

use crate::env::EnvVar;

/// 按 `CIVICLENS_LOG_LEVEL` 安装日志订阅器
///
/// 日志写入 stderr，stdout 只输出译文。重复调用时保留已安装的订阅器。
pub fn init_tracing() {
    let level = env::core::LogLevel::get()
        .ok()
        .and_then(|level| level.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
