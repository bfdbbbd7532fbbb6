//! API 处理器

pub mod cache;
pub mod languages;
pub mod texts;
pub mod translation;

pub use cache::*;
pub use languages::*;
pub use texts::*;
pub use translation::*;
