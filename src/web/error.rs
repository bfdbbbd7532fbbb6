//! Web 服务器启动与运行错误

use thiserror::Error;

use crate::env::EnvError;
use crate::translation::TranslationError;

/// Web 服务器错误
///
/// 翻译层错误原样包装；监听与运行阶段的失败单独归类为 IO 错误。
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Web 配置无效: {0}")]
    Config(#[from] EnvError),

    #[error("无法绑定地址 {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("服务器运行错误: {0}")]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    Translation(#[from] TranslationError),
}
