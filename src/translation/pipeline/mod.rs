//! 翻译管道模块
//!
//! 提供前缀拆分和批量翻译

pub mod batch;
pub mod prefix;

// 重新导出主要类型
pub use batch::{BatchOutcome, BatchReport, BatchRunner};
pub use prefix::{reverse_prefix, split_prefix, PrefixedText, SplitRule};
